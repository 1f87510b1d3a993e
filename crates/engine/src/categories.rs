//! Category registry.
//!
//! Categories are named tags for transactions and budget allocations. Each
//! one belongs to a single [`TransactionKind`]; names are unique within a
//! kind.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, TransactionKind};

pub const FALLBACK_COLOR: &str = "#6b7280";
pub const FALLBACK_ICON: &str = "📝";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: TransactionKind,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Display data copied from a category when a transaction or an allocation
/// is read. Never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn snapshot(&self) -> CategorySnapshot {
        CategorySnapshot {
            name: self.name.clone(),
            color: styling_or(self.color.as_deref(), FALLBACK_COLOR),
            icon: styling_or(self.icon.as_deref(), FALLBACK_ICON),
        }
    }
}

fn styling_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub(crate) struct DefaultCategory {
    pub(crate) name: &'static str,
    pub(crate) kind: TransactionKind,
    pub(crate) color: &'static str,
    pub(crate) icon: &'static str,
}

const fn default_category(
    name: &'static str,
    kind: TransactionKind,
    color: &'static str,
    icon: &'static str,
) -> DefaultCategory {
    DefaultCategory {
        name,
        kind,
        color,
        icon,
    }
}

/// Categories created the first time an empty store is listed.
pub(crate) const DEFAULT_CATEGORIES: [DefaultCategory; 13] = [
    default_category("Salary", TransactionKind::Income, "#10b981", "briefcase"),
    default_category("Freelance", TransactionKind::Income, "#3b82f6", "laptop"),
    default_category("Investment", TransactionKind::Income, "#8b5cf6", "trending-up"),
    default_category("Other Income", TransactionKind::Income, "#6366f1", "plus-circle"),
    default_category("Food & Dining", TransactionKind::Expense, "#ef4444", "utensils"),
    default_category("Transportation", TransactionKind::Expense, "#f97316", "car"),
    default_category("Shopping", TransactionKind::Expense, "#ec4899", "shopping-bag"),
    default_category("Entertainment", TransactionKind::Expense, "#8b5cf6", "film"),
    default_category("Bills & Utilities", TransactionKind::Expense, "#06b6d4", "home"),
    default_category("Healthcare", TransactionKind::Expense, "#14b8a6", "heart"),
    default_category("Education", TransactionKind::Expense, "#3b82f6", "book"),
    default_category("Travel", TransactionKind::Expense, "#10b981", "plane"),
    default_category(
        "Other Expenses",
        TransactionKind::Expense,
        "#6b7280",
        "more-horizontal",
    ),
];

impl DefaultCategory {
    pub(crate) fn to_category(&self) -> Category {
        Category {
            id: Uuid::now_v7(),
            name: self.name.to_string(),
            kind: self.kind,
            color: Some(self.color.to_string()),
            icon: Some(self.icon.to_string()),
            description: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id),
            name: ActiveValue::Set(category.name.clone()),
            kind: ActiveValue::Set(category.kind.as_str().to_string()),
            color: ActiveValue::Set(category.color.clone()),
            icon: ActiveValue::Set(category.icon.clone()),
            description: ActiveValue::Set(category.description.clone()),
            created_at: ActiveValue::Set(category.created_at),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            color: model.color,
            icon: model.icon,
            description: model.description,
            created_at: model.created_at,
        })
    }
}
