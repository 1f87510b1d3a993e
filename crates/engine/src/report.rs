//! Dashboard derivations over an in-memory transaction list.
//!
//! Nothing here touches a store: the functions summarise whatever slice they
//! are given, so dashboard figures describe the loaded window, not the whole
//! history.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Month};

use crate::{EngineError, Money, ResultEngine, Transaction, TransactionKind};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const MAX_BREAKDOWN_ENTRIES: usize = 10;
pub const MAX_TREND_MONTHS: usize = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_income: Money,
    pub total_expenses: Money,
    pub balance: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    /// `Jan 2024`
    pub label: String,
    pub amount: Money,
}

fn add(total: Money, amount: Money) -> ResultEngine<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| EngineError::Validation("totals exceed the supported range".to_string()))
}

fn total(mut amounts: impl Iterator<Item = Money>) -> ResultEngine<Money> {
    amounts.try_fold(Money::ZERO, add)
}

pub fn summary(transactions: &[Transaction]) -> ResultEngine<Summary> {
    let total_of = |kind: TransactionKind| {
        total(
            transactions
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.amount),
        )
    };
    Ok(Summary {
        total_income: total_of(TransactionKind::Income)?,
        total_expenses: total_of(TransactionKind::Expense)?,
        balance: total(transactions.iter().map(Transaction::signed_amount))?,
    })
}

fn expenses(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
}

/// Expense totals per category name, largest first (ties by name), top 10.
pub fn category_breakdown(transactions: &[Transaction]) -> ResultEngine<Vec<CategoryTotal>> {
    let mut totals: HashMap<&str, Money> = HashMap::new();
    for transaction in expenses(transactions) {
        let name = transaction
            .category
            .as_ref()
            .map_or(UNCATEGORIZED, |c| c.name.as_str());
        let entry = totals.entry(name).or_default();
        *entry = add(*entry, transaction.amount)?;
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(name, amount)| CategoryTotal {
            category: name.to_string(),
            amount,
        })
        .collect();
    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    breakdown.truncate(MAX_BREAKDOWN_ENTRIES);
    Ok(breakdown)
}

/// Expense totals per UTC calendar month, oldest first, last 12 months.
pub fn monthly_trend(transactions: &[Transaction]) -> ResultEngine<Vec<MonthlyTotal>> {
    let mut totals: BTreeMap<(i32, u32), Money> = BTreeMap::new();
    for transaction in expenses(transactions) {
        let key = (transaction.date.year(), transaction.date.month());
        let entry = totals.entry(key).or_default();
        *entry = add(*entry, transaction.amount)?;
    }

    let skip = totals.len().saturating_sub(MAX_TREND_MONTHS);
    Ok(totals
        .into_iter()
        .skip(skip)
        .map(|((year, month), amount)| MonthlyTotal {
            month: format!("{year:04}-{month:02}"),
            label: month_label(year, month),
            amount,
        })
        .collect())
}

fn month_label(year: i32, month: u32) -> String {
    let name = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("???", |m| &m.name()[..3]);
    format!("{name} {year}")
}
