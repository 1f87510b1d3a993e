//! Plain-text output for the offline CLI.

use chrono::{DateTime, Utc};
use engine::{Budget, Category, Currency, Dashboard, SavingsGoal, Transaction};

fn day(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn categories(categories: &[Category]) {
    for category in categories {
        let snapshot = category.snapshot();
        println!(
            "{} {:<20} {:<8} {} {}",
            snapshot.icon,
            category.name,
            category.kind.as_str(),
            snapshot.color,
            category.id
        );
    }
}

pub fn transactions(transactions: &[Transaction], currency: Currency) {
    for tx in transactions {
        let category = tx
            .category
            .as_ref()
            .map_or_else(|| "-".to_string(), |c| format!("{} {}", c.icon, c.name));
        println!(
            "{}  {:>14}  {:<24} {}",
            day(tx.date),
            currency.format(tx.signed_amount()),
            category,
            tx.description.as_deref().unwrap_or("")
        );
    }
}

pub fn budget(budget: &Budget, currency: Currency) {
    println!(
        "{} [{}] {} .. {}  {}",
        budget.name,
        budget.period.as_str(),
        day(budget.start_date),
        day(budget.end_date),
        budget.id
    );
    println!(
        "  amount {}  spent {}  remaining {}",
        currency.format(budget.amount),
        currency.format(budget.spent),
        currency.format(budget.remaining())
    );
    for allocation in &budget.categories {
        let name = allocation
            .category
            .as_ref()
            .map_or("(deleted category)", |c| c.name.as_str());
        println!(
            "    {:<24} {:>14}  spent {}",
            name,
            currency.format(allocation.amount),
            currency.format(allocation.spent)
        );
    }
}

pub fn savings_goal(goal: &SavingsGoal, currency: Currency) {
    let target_date = goal.target_date.map(day).unwrap_or_default();
    println!(
        "{} [{}] {} / {} ({}%) {}  {}",
        goal.name,
        goal.status.as_str(),
        currency.format(goal.current_amount),
        currency.format(goal.target_amount),
        goal.progress_percent(),
        target_date,
        goal.id
    );
}

pub fn dashboard(dashboard: &Dashboard) {
    let currency = dashboard.currency;
    let summary = &dashboard.summary;
    println!("Income    {}", currency.format(summary.total_income));
    println!("Expenses  {}", currency.format(summary.total_expenses));
    println!("Balance   {}", currency.format(summary.balance));

    println!();
    println!("Recent transactions");
    transactions(&dashboard.recent_transactions, currency);

    if !dashboard.category_breakdown.is_empty() {
        println!();
        println!("Spending by category");
        for entry in &dashboard.category_breakdown {
            println!("  {:<24} {:>14}", entry.category, currency.format(entry.amount));
        }
    }

    if !dashboard.monthly_trend.is_empty() {
        println!();
        println!("Monthly spending");
        for month in &dashboard.monthly_trend {
            println!("  {:<10} {:>14}", month.label, currency.format(month.amount));
        }
    }

    if !dashboard.budgets.is_empty() {
        println!();
        println!("Budgets");
        for item in &dashboard.budgets {
            budget(item, currency);
        }
    }

    if !dashboard.savings_goals.is_empty() {
        println!();
        println!("Savings goals");
        for goal in &dashboard.savings_goals {
            savings_goal(goal, currency);
        }
    }
}
