//! Conversions between engine types and wire payloads.

use api_types::{
    Amount, CategorySnapshot, TransactionType,
    budget::{self as api_budget, BudgetPeriod as ApiPeriod},
    category as api_category,
    currency::CurrencyInfo,
    dashboard as api_dashboard,
    savings_goal::{self as api_goal, GoalStatus as ApiStatus},
    transaction as api_transaction,
};
use engine::{Money, report};
use uuid::Uuid;

use crate::ServerError;

pub(crate) fn parse_amount(amount: &Amount) -> Result<Money, ServerError> {
    Ok(amount.as_str().parse::<Money>()?)
}

pub(crate) fn amount(money: Money) -> Amount {
    Amount::from_cents(money.cents())
}

/// Malformed ids cannot exist, so they are reported as not found.
pub(crate) fn parse_id(raw: &str, label: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        ServerError::Engine(engine::EngineError::NotFound(format!(
            "{label} not found: {raw}"
        )))
    })
}

pub(crate) fn kind_from_api(kind: TransactionType) -> engine::TransactionKind {
    match kind {
        TransactionType::Income => engine::TransactionKind::Income,
        TransactionType::Expense => engine::TransactionKind::Expense,
    }
}

fn map_kind(kind: engine::TransactionKind) -> TransactionType {
    match kind {
        engine::TransactionKind::Income => TransactionType::Income,
        engine::TransactionKind::Expense => TransactionType::Expense,
    }
}

pub(crate) fn period_from_api(period: ApiPeriod) -> engine::BudgetPeriod {
    match period {
        ApiPeriod::Weekly => engine::BudgetPeriod::Weekly,
        ApiPeriod::Monthly => engine::BudgetPeriod::Monthly,
        ApiPeriod::Quarterly => engine::BudgetPeriod::Quarterly,
        ApiPeriod::Yearly => engine::BudgetPeriod::Yearly,
    }
}

fn map_period(period: engine::BudgetPeriod) -> ApiPeriod {
    match period {
        engine::BudgetPeriod::Weekly => ApiPeriod::Weekly,
        engine::BudgetPeriod::Monthly => ApiPeriod::Monthly,
        engine::BudgetPeriod::Quarterly => ApiPeriod::Quarterly,
        engine::BudgetPeriod::Yearly => ApiPeriod::Yearly,
    }
}

pub(crate) fn status_from_api(status: ApiStatus) -> engine::GoalStatus {
    match status {
        ApiStatus::Active => engine::GoalStatus::Active,
        ApiStatus::Completed => engine::GoalStatus::Completed,
        ApiStatus::Paused => engine::GoalStatus::Paused,
    }
}

fn map_status(status: engine::GoalStatus) -> ApiStatus {
    match status {
        engine::GoalStatus::Active => ApiStatus::Active,
        engine::GoalStatus::Completed => ApiStatus::Completed,
        engine::GoalStatus::Paused => ApiStatus::Paused,
    }
}

fn map_snapshot(snapshot: engine::CategorySnapshot) -> CategorySnapshot {
    CategorySnapshot {
        name: snapshot.name,
        color: snapshot.color,
        icon: snapshot.icon,
    }
}

pub(crate) fn category_view(category: engine::Category) -> api_category::Category {
    api_category::Category {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        color: category.color,
        icon: category.icon,
        description: category.description,
        created_at: category.created_at,
    }
}

pub(crate) fn transaction_view(tx: engine::Transaction) -> api_transaction::Transaction {
    api_transaction::Transaction {
        id: tx.id,
        amount: amount(tx.amount),
        description: tx.description,
        date: tx.date,
        kind: map_kind(tx.kind),
        category_id: tx.category_id,
        user_id: tx.user_id,
        created_at: tx.created_at,
        category: tx.category.map(map_snapshot),
    }
}

pub(crate) fn budget_view(budget: engine::Budget) -> api_budget::Budget {
    api_budget::Budget {
        id: budget.id,
        name: budget.name,
        amount: amount(budget.amount),
        spent: amount(budget.spent),
        period: map_period(budget.period),
        start_date: budget.start_date,
        end_date: budget.end_date,
        user_id: budget.user_id,
        created_at: budget.created_at,
        updated_at: budget.updated_at,
        categories: budget
            .categories
            .into_iter()
            .map(|allocation| api_budget::BudgetCategory {
                id: allocation.id,
                budget_id: allocation.budget_id,
                category_id: allocation.category_id,
                amount: amount(allocation.amount),
                spent: amount(allocation.spent),
                category: allocation.category.map(map_snapshot),
            })
            .collect(),
    }
}

pub(crate) fn savings_goal_view(goal: engine::SavingsGoal) -> api_goal::SavingsGoal {
    api_goal::SavingsGoal {
        progress: goal.progress_percent(),
        id: goal.id,
        name: goal.name,
        target_amount: amount(goal.target_amount),
        current_amount: amount(goal.current_amount),
        target_date: goal.target_date,
        description: goal.description,
        status: map_status(goal.status),
        user_id: goal.user_id,
        created_at: goal.created_at,
        updated_at: goal.updated_at,
    }
}

pub(crate) fn currency_info(currency: engine::Currency) -> CurrencyInfo {
    CurrencyInfo {
        code: currency.code().to_string(),
        name: currency.name().to_string(),
        symbol: currency.symbol().to_string(),
        locale: currency.locale().to_string(),
    }
}

pub(crate) fn dashboard_view(dashboard: engine::Dashboard) -> api_dashboard::Dashboard {
    let report::Summary {
        total_income,
        total_expenses,
        balance,
    } = dashboard.summary;

    api_dashboard::Dashboard {
        summary: api_dashboard::Summary {
            total_income: amount(total_income),
            total_expenses: amount(total_expenses),
            balance: amount(balance),
        },
        recent_transactions: dashboard
            .recent_transactions
            .into_iter()
            .map(transaction_view)
            .collect(),
        budgets: dashboard.budgets.into_iter().map(budget_view).collect(),
        savings_goals: dashboard
            .savings_goals
            .into_iter()
            .map(savings_goal_view)
            .collect(),
        category_breakdown: dashboard
            .category_breakdown
            .into_iter()
            .map(|entry| api_dashboard::CategoryTotal {
                category: entry.category,
                amount: amount(entry.amount),
            })
            .collect(),
        monthly_trend: dashboard
            .monthly_trend
            .into_iter()
            .map(|entry| api_dashboard::MonthlyTotal {
                month: entry.month,
                label: entry.label,
                amount: amount(entry.amount),
            })
            .collect(),
        currency: currency_info(dashboard.currency),
    }
}
