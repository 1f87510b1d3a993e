use crate::{
    Budget, Currency, ResultEngine, SavingsGoal, Store, StoreTx, Transaction,
    preferences::CURRENCY_KEY,
    report::{self, CategoryTotal, MonthlyTotal, Summary},
};

use super::{CategoryIndex, Engine, budgets::attach_allocations, with_tx};

const DEFAULT_DASHBOARD_WINDOW: u64 = 5;
const DASHBOARD_BUDGETS: u64 = 3;
const DASHBOARD_GOALS: u64 = 3;

/// Everything the dashboard screen shows, computed from one consistent read.
///
/// Totals and charts only cover `recent_transactions`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    pub summary: Summary,
    pub recent_transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub savings_goals: Vec<SavingsGoal>,
    pub category_breakdown: Vec<CategoryTotal>,
    pub monthly_trend: Vec<MonthlyTotal>,
    pub currency: Currency,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Health {
    pub backend: &'static str,
    pub categories_count: u64,
    pub transactions_count: u64,
}

impl<S: Store> Engine<S> {
    /// Build the dashboard over the `window` most recent transactions
    /// (default 5), the 3 newest budgets and the 3 newest goals.
    pub async fn dashboard(&self, window: Option<u64>) -> ResultEngine<Dashboard> {
        let window = window.unwrap_or(DEFAULT_DASHBOARD_WINDOW);
        with_tx!(self, |tx| {
            let index = CategoryIndex::load(&mut tx).await?;

            let mut recent_transactions = tx.transactions(Some(window)).await?;
            for transaction in &mut recent_transactions {
                index.enrich_transaction(transaction);
            }

            let mut budgets = tx.budgets(Some(DASHBOARD_BUDGETS)).await?;
            for budget in &mut budgets {
                attach_allocations(&mut tx, &index, budget).await?;
            }
            let savings_goals = tx.savings_goals(Some(DASHBOARD_GOALS)).await?;
            let stored_currency = tx.preference(CURRENCY_KEY).await?;

            Ok(Dashboard {
                summary: report::summary(&recent_transactions)?,
                category_breakdown: report::category_breakdown(&recent_transactions)?,
                monthly_trend: report::monthly_trend(&recent_transactions)?,
                recent_transactions,
                budgets,
                savings_goals,
                currency: self.resolve_currency(stored_currency.as_deref()),
            })
        })
    }

    pub async fn health(&self) -> ResultEngine<Health> {
        with_tx!(self, |tx| {
            Ok(Health {
                backend: self.store.backend(),
                categories_count: tx.count_categories().await?,
                transactions_count: tx.count_transactions().await?,
            })
        })
    }
}
