//! Transaction primitives.
//!
//! A `Transaction` is a dated money movement, either income or expense,
//! optionally tagged with a [`Category`](crate::Category). Amounts are always
//! positive: the kind decides the sign used by reports.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CategorySnapshot, EngineError, Money, ResultEngine, util::ensure_positive};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: Money,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    pub category_id: Option<Uuid>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    /// Denormalized category styling, filled in on read.
    #[serde(skip)]
    pub category: Option<CategorySnapshot>,
}

impl Transaction {
    pub fn new(
        amount: Money,
        description: Option<String>,
        date: DateTime<Utc>,
        kind: TransactionKind,
        category_id: Option<Uuid>,
        user_id: String,
    ) -> ResultEngine<Self> {
        ensure_positive(amount, "amount")?;
        Ok(Self {
            id: Uuid::now_v7(),
            amount,
            description,
            date,
            kind,
            category_id,
            user_id,
            created_at: Utc::now(),
            category: None,
        })
    }

    /// Amount with the sign implied by the kind: income positive, expense
    /// negative.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: DateTimeUtc,
    pub kind: String,
    pub category_id: Option<Uuid>,
    pub user_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category_id: ActiveValue::Set(tx.category_id),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            amount: Money::new(model.amount_minor),
            description: model.description,
            date: model.date,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            category_id: model.category_id,
            user_id: model.user_id,
            created_at: model.created_at,
            category: None,
        })
    }
}
