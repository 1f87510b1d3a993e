use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    GoalStatus, Money, ResultEngine, SavingsGoal, Store, StoreTx,
    util::{ensure_non_negative, ensure_positive, normalize_optional_text, normalize_required_name},
};

use super::{Engine, not_found, with_tx};

/// Input for [`Engine::create_savings_goal`].
#[derive(Clone, Debug)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: Money,
    /// Defaults to zero.
    pub current_amount: Option<Money>,
    pub target_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Full replacement payload for [`Engine::update_savings_goal`].
///
/// Omitted optional fields are cleared (`current_amount` becomes zero),
/// except `status` which keeps its current value.
#[derive(Clone, Debug)]
pub struct SavingsGoalUpdate {
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Option<Money>,
    pub target_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub status: Option<GoalStatus>,
}

fn validate_amounts(target: Money, current: Money) -> ResultEngine<()> {
    ensure_positive(target, "target amount")?;
    ensure_non_negative(current, "current amount")
}

impl<S: Store> Engine<S> {
    pub async fn list_savings_goals(&self, limit: Option<u64>) -> ResultEngine<Vec<SavingsGoal>> {
        with_tx!(self, |tx| tx.savings_goals(limit).await)
    }

    pub async fn savings_goal(&self, id: Uuid) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |tx| {
            tx.savings_goal(id)
                .await?
                .ok_or_else(|| not_found("savings goal", id))
        })
    }

    pub async fn create_savings_goal(&self, input: NewSavingsGoal) -> ResultEngine<SavingsGoal> {
        let name = normalize_required_name(&input.name, "savings goal")?;
        let current_amount = input.current_amount.unwrap_or(Money::ZERO);
        validate_amounts(input.target_amount, current_amount)?;

        let now = Utc::now();
        let goal = SavingsGoal {
            id: Uuid::now_v7(),
            name,
            target_amount: input.target_amount,
            current_amount,
            target_date: input.target_date,
            description: normalize_optional_text(input.description.as_deref()),
            status: GoalStatus::Active,
            user_id: self.user_id.clone(),
            created_at: now,
            updated_at: now,
        };

        with_tx!(self, |tx| {
            tx.insert_savings_goal(&goal).await?;
            Ok(goal)
        })
    }

    pub async fn update_savings_goal(
        &self,
        id: Uuid,
        input: SavingsGoalUpdate,
    ) -> ResultEngine<SavingsGoal> {
        let name = normalize_required_name(&input.name, "savings goal")?;
        let current_amount = input.current_amount.unwrap_or(Money::ZERO);

        with_tx!(self, |tx| {
            let existing = tx
                .savings_goal(id)
                .await?
                .ok_or_else(|| not_found("savings goal", id))?;
            validate_amounts(input.target_amount, current_amount)?;

            let goal = SavingsGoal {
                name,
                target_amount: input.target_amount,
                current_amount,
                target_date: input.target_date,
                description: normalize_optional_text(input.description.as_deref()),
                status: input.status.unwrap_or(existing.status),
                updated_at: Utc::now(),
                ..existing
            };
            if !tx.update_savings_goal(&goal).await? {
                return Err(not_found("savings goal", id));
            }
            Ok(goal)
        })
    }

    pub async fn delete_savings_goal(&self, id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |tx| {
            if !tx.delete_savings_goal(id).await? {
                return Err(not_found("savings goal", id));
            }
            Ok(())
        })
    }
}
