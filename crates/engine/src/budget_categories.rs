use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CategorySnapshot, EngineError, Money};

/// One allocation of a budget to a category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount: Money,
    pub spent: Money,
    #[serde(skip)]
    pub category: Option<CategorySnapshot>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub spent_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Budget,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BudgetCategory> for ActiveModel {
    fn from(allocation: &BudgetCategory) -> Self {
        Self {
            id: ActiveValue::Set(allocation.id),
            budget_id: ActiveValue::Set(allocation.budget_id),
            category_id: ActiveValue::Set(allocation.category_id),
            amount_minor: ActiveValue::Set(allocation.amount.cents()),
            spent_minor: ActiveValue::Set(allocation.spent.cents()),
        }
    }
}

impl TryFrom<Model> for BudgetCategory {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            budget_id: model.budget_id,
            category_id: model.category_id,
            amount: Money::new(model.amount_minor),
            spent: Money::new(model.spent_minor),
            category: None,
        })
    }
}
