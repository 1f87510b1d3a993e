//! JSON payloads of the `/api` surface.
//!
//! Field names are camelCase on the wire. Money travels as a decimal JSON
//! number (see [`Amount`]) and dates as RFC 3339 strings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use uuid::Uuid;

/// A decimal money amount as written on the wire.
///
/// Inbound values may be JSON numbers (`12.34`) or strings (`"12.34"`,
/// `"12,34"`); the text is kept as-is and validated by whoever converts it to
/// cents. Outbound values are written as JSON numbers; amounts with at most
/// 15 significant digits come back with the same decimal value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amount(String);

impl Amount {
    /// Build an amount from integer cents (`1234` becomes `12.34`).
    pub fn from_cents(cents: i64) -> Self {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        Self(format!("{sign}{}.{:02}", abs / 100, abs % 100))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.replace(',', ".").parse::<f64>() {
            Ok(value) if value.is_finite() => serializer.serialize_f64(value),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal number or a decimal string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                Ok(Amount(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
                if !v.is_finite() {
                    return Err(E::custom("amount must be finite"));
                }
                Ok(Amount(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                Ok(Amount(v.trim().to_string()))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Lenient date parsing: RFC 3339 date-times or plain `YYYY-MM-DD` dates
/// (midnight UTC).
pub mod date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, de};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw}")))
    }

    /// Like [`deserialize`] but `null`, absent and empty strings become `None`.
    pub fn option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date: {raw}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

/// `{ name, color, icon }` copied from the linked category on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// `?limit=` on list endpoints.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u64>,
}

/// `{ success: true }` returned by deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Success {
    pub success: bool,
}

/// Uniform error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod category {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryQuery {
        #[serde(rename = "type")]
        pub kind: Option<TransactionType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Category {
        pub id: Uuid,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub color: Option<String>,
        pub icon: Option<String>,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub amount: Amount,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub description: Option<String>,
        /// Defaults to now.
        #[serde(default, deserialize_with = "date::option")]
        pub date: Option<DateTime<Utc>>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: Uuid,
        pub amount: Amount,
        pub description: Option<String>,
        pub date: DateTime<Utc>,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub category_id: Option<Uuid>,
        pub user_id: String,
        pub created_at: DateTime<Utc>,
        pub category: Option<CategorySnapshot>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum BudgetPeriod {
        Weekly,
        Monthly,
        Quarterly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetCategoryInput {
        pub category_id: Uuid,
        pub amount: Amount,
    }

    /// Body of both `POST /api/budgets` and `PUT /api/budgets/{id}`.
    ///
    /// On `PUT` the `categories` list replaces every allocation; omitting it
    /// removes them all.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetInput {
        pub name: String,
        pub amount: Amount,
        pub period: BudgetPeriod,
        #[serde(deserialize_with = "date::deserialize")]
        pub start_date: DateTime<Utc>,
        #[serde(deserialize_with = "date::deserialize")]
        pub end_date: DateTime<Utc>,
        #[serde(default)]
        pub categories: Vec<BudgetCategoryInput>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetCategory {
        pub id: Uuid,
        pub budget_id: Uuid,
        pub category_id: Uuid,
        pub amount: Amount,
        pub spent: Amount,
        pub category: Option<CategorySnapshot>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Budget {
        pub id: Uuid,
        pub name: String,
        pub amount: Amount,
        pub spent: Amount,
        pub period: BudgetPeriod,
        pub start_date: DateTime<Utc>,
        pub end_date: DateTime<Utc>,
        pub user_id: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub categories: Vec<BudgetCategory>,
    }
}

pub mod savings_goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum GoalStatus {
        Active,
        Completed,
        Paused,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsGoalNew {
        pub name: String,
        pub target_amount: Amount,
        pub current_amount: Option<Amount>,
        #[serde(default, deserialize_with = "date::option")]
        pub target_date: Option<DateTime<Utc>>,
        pub description: Option<String>,
    }

    /// Full replacement body of `PUT /api/savings-goals/{id}`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsGoalUpdate {
        pub name: String,
        pub target_amount: Amount,
        pub current_amount: Option<Amount>,
        #[serde(default, deserialize_with = "date::option")]
        pub target_date: Option<DateTime<Utc>>,
        pub description: Option<String>,
        pub status: Option<GoalStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SavingsGoal {
        pub id: Uuid,
        pub name: String,
        pub target_amount: Amount,
        pub current_amount: Amount,
        pub target_date: Option<DateTime<Utc>>,
        pub description: Option<String>,
        pub status: GoalStatus,
        pub user_id: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        /// Whole-number progress, capped at 100.
        pub progress: u8,
    }
}

pub mod currency {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyInfo {
        pub code: String,
        pub name: String,
        pub symbol: String,
        pub locale: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyPreference {
        pub currency: CurrencyInfo,
        pub available: Vec<CurrencyInfo>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CurrencyUpdate {
        pub code: String,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Summary {
        pub total_income: Amount,
        pub total_expenses: Amount,
        pub balance: Amount,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotal {
        pub category: String,
        pub amount: Amount,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyTotal {
        pub month: String,
        pub label: String,
        pub amount: Amount,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Dashboard {
        pub summary: Summary,
        pub recent_transactions: Vec<transaction::Transaction>,
        pub budgets: Vec<budget::Budget>,
        pub savings_goals: Vec<savings_goal::SavingsGoal>,
        pub category_breakdown: Vec<CategoryTotal>,
        pub monthly_trend: Vec<MonthlyTotal>,
        pub currency: currency::CurrencyInfo,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Health {
        pub message: String,
        pub database: String,
        pub categories_count: u64,
        pub transactions_count: u64,
        pub status: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_accepts_numbers_and_strings() {
        let parsed: Vec<Amount> = serde_json::from_str(r#"[12.34, 10, "7,5", " 3.00 "]"#).unwrap();
        let text: Vec<&str> = parsed.iter().map(Amount::as_str).collect();
        assert_eq!(text, vec!["12.34", "10", "7,5", "3.00"]);
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }

    #[test]
    fn amount_serializes_as_number() {
        let json = serde_json::to_string(&Amount::from_cents(123_456)).unwrap();
        assert_eq!(json, "1234.56");
        let json = serde_json::to_string(&Amount::from_cents(-5)).unwrap();
        assert_eq!(json, "-0.05");
    }

    #[test]
    fn fifteen_digit_amounts_keep_their_decimal_text() {
        for (cents, text) in [
            (999_999_999_999_999, "9999999999999.99"),
            (-999_999_999_999_999, "-9999999999999.99"),
            (123_456_789_012_345, "1234567890123.45"),
            (100_000_000_000_001, "1000000000000.01"),
        ] {
            let json = serde_json::to_string(&Amount::from_cents(cents)).unwrap();
            assert_eq!(json, text);
            let back: Amount = serde_json::from_str(&json).unwrap();
            assert_eq!(back.as_str(), text);
        }
    }

    #[test]
    fn dates_accept_plain_days_and_rfc3339() {
        let day = date::parse("2024-02-29").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-02-29T00:00:00+00:00");
        let instant = date::parse("2024-02-29T10:30:00+02:00").unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-02-29T08:30:00+00:00");
        assert!(date::parse("29/02/2024").is_none());
    }

    #[test]
    fn transaction_new_defaults_optional_fields() {
        let payload: transaction::TransactionNew =
            serde_json::from_str(r#"{"amount": 25.5, "type": "EXPENSE"}"#).unwrap();
        assert_eq!(payload.amount.as_str(), "25.5");
        assert_eq!(payload.kind, TransactionType::Expense);
        assert!(payload.date.is_none());
        assert!(payload.category_id.is_none());

        let missing = serde_json::from_str::<transaction::TransactionNew>(r#"{"type": "INCOME"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn budget_input_categories_default_to_empty() {
        let payload: budget::BudgetInput = serde_json::from_str(
            r#"{"name":"Food","amount":"300","period":"MONTHLY","startDate":"2024-01-01","endDate":"2024-01-31"}"#,
        )
        .unwrap();
        assert!(payload.categories.is_empty());
        assert_eq!(payload.period, budget::BudgetPeriod::Monthly);
    }
}
