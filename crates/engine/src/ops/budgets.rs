use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Budget, BudgetCategory, BudgetPeriod, EngineError, Money, ResultEngine, Store, StoreTx,
    util::{ensure_non_negative, ensure_positive, normalize_required_name},
};

use super::{CategoryIndex, Engine, not_found, with_tx};

/// One category allocation in a [`BudgetInput`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationInput {
    pub category_id: Uuid,
    pub amount: Money,
}

/// Full budget payload used by both create and update.
///
/// On update the allocation list replaces every existing allocation: an
/// empty list removes them all.
#[derive(Clone, Debug)]
pub struct BudgetInput {
    pub name: String,
    pub amount: Money,
    pub period: BudgetPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub categories: Vec<AllocationInput>,
}

impl BudgetInput {
    fn validate(&self, index: &CategoryIndex) -> ResultEngine<String> {
        let name = normalize_required_name(&self.name, "budget")?;
        ensure_positive(self.amount, "budget amount")?;
        if self.end_date < self.start_date {
            return Err(EngineError::Validation(
                "end date must not be before start date".to_string(),
            ));
        }
        for allocation in &self.categories {
            ensure_non_negative(allocation.amount, "allocation amount")?;
            if !index.contains(allocation.category_id) {
                return Err(EngineError::Validation(format!(
                    "category not found: {}",
                    allocation.category_id
                )));
            }
        }
        Ok(name)
    }
}

impl<S: Store> Engine<S> {
    /// Most recently created budgets first, with their allocations.
    pub async fn list_budgets(&self, limit: Option<u64>) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |tx| {
            let index = CategoryIndex::load(&mut tx).await?;
            let mut budgets = tx.budgets(limit).await?;
            for budget in &mut budgets {
                attach_allocations(&mut tx, &index, budget).await?;
            }
            Ok(budgets)
        })
    }

    pub async fn budget(&self, id: Uuid) -> ResultEngine<Budget> {
        with_tx!(self, |tx| {
            let mut budget = tx.budget(id).await?.ok_or_else(|| not_found("budget", id))?;
            let index = CategoryIndex::load(&mut tx).await?;
            attach_allocations(&mut tx, &index, &mut budget).await?;
            Ok(budget)
        })
    }

    /// Create the header and one allocation per input category, atomically.
    /// `spent` starts at zero everywhere.
    pub async fn create_budget(&self, input: BudgetInput) -> ResultEngine<Budget> {
        with_tx!(self, |tx| {
            let index = CategoryIndex::load(&mut tx).await?;
            let name = input.validate(&index)?;

            let now = Utc::now();
            let mut budget = Budget {
                id: Uuid::now_v7(),
                name,
                amount: input.amount,
                spent: Money::ZERO,
                period: input.period,
                start_date: input.start_date,
                end_date: input.end_date,
                user_id: self.user_id.clone(),
                created_at: now,
                updated_at: now,
                categories: Vec::new(),
            };
            tx.insert_budget(&budget).await?;
            budget.categories =
                insert_allocations(&mut tx, &index, budget.id, &input.categories).await?;
            tracing::debug!(
                id = %budget.id,
                allocations = budget.categories.len(),
                "budget created"
            );
            Ok(budget)
        })
    }

    /// Replace the header fields and every allocation of an existing budget.
    ///
    /// `spent` and `created_at` of the header are kept; recreated allocations
    /// start at zero spent.
    pub async fn update_budget(&self, id: Uuid, input: BudgetInput) -> ResultEngine<Budget> {
        with_tx!(self, |tx| {
            let existing = tx.budget(id).await?.ok_or_else(|| not_found("budget", id))?;
            let index = CategoryIndex::load(&mut tx).await?;
            let name = input.validate(&index)?;

            let mut budget = Budget {
                name,
                amount: input.amount,
                period: input.period,
                start_date: input.start_date,
                end_date: input.end_date,
                updated_at: Utc::now(),
                categories: Vec::new(),
                ..existing
            };
            if !tx.update_budget(&budget).await? {
                return Err(not_found("budget", id));
            }
            let removed = tx.delete_budget_categories(id).await?;
            budget.categories = insert_allocations(&mut tx, &index, id, &input.categories).await?;
            tracing::debug!(
                %id,
                removed,
                created = budget.categories.len(),
                "budget allocations replaced"
            );
            Ok(budget)
        })
    }

    /// Delete the allocations, then the budget.
    pub async fn delete_budget(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |tx| {
            if tx.budget(id).await?.is_none() {
                return Err(not_found("budget", id));
            }
            tx.delete_budget_categories(id).await?;
            if !tx.delete_budget(id).await? {
                return Err(not_found("budget", id));
            }
            Ok(())
        })
    }
}

pub(super) async fn attach_allocations<T: StoreTx>(
    tx: &mut T,
    index: &CategoryIndex,
    budget: &mut Budget,
) -> ResultEngine<()> {
    let mut allocations = tx.budget_categories(budget.id).await?;
    for allocation in &mut allocations {
        index.enrich_allocation(allocation);
    }
    budget.categories = allocations;
    Ok(())
}

async fn insert_allocations<T: StoreTx>(
    tx: &mut T,
    index: &CategoryIndex,
    budget_id: Uuid,
    inputs: &[AllocationInput],
) -> ResultEngine<Vec<BudgetCategory>> {
    let mut allocations = Vec::with_capacity(inputs.len());
    for input in inputs {
        let mut allocation = BudgetCategory {
            id: Uuid::now_v7(),
            budget_id,
            category_id: input.category_id,
            amount: input.amount,
            spent: Money::ZERO,
            category: None,
        };
        tx.insert_budget_category(&allocation).await?;
        index.enrich_allocation(&mut allocation);
        allocations.push(allocation);
    }
    Ok(allocations)
}
