//! Personal-finance bookkeeping engine.
//!
//! The [`Engine`] owns every business rule (default categories, validation,
//! budget allocation replacement, category snapshots) and runs each
//! operation inside one transaction of a [`Store`]. Two stores are
//! provided: [`RelationalStore`] over SeaORM and [`LocalStore`] over a JSON
//! file.

pub use budget_categories::BudgetCategory;
pub use budgets::{Budget, BudgetPeriod};
pub use categories::{Category, CategorySnapshot, FALLBACK_COLOR, FALLBACK_ICON};
pub use currency::Currency;
pub use error::EngineError;
pub use money::Money;
pub use ops::{
    AllocationInput, BudgetInput, DEFAULT_USER_ID, Dashboard, Engine, EngineBuilder, Health,
    NewCategory, NewSavingsGoal, NewTransaction, SavingsGoalUpdate,
};
pub use savings_goals::{GoalStatus, SavingsGoal};
pub use store::{LocalStore, RelationalStore, Store, StoreTx};
pub use transactions::{Transaction, TransactionKind};

pub mod budget_categories;
pub mod budgets;
pub mod categories;
mod currency;
mod error;
mod money;
mod ops;
pub mod preferences;
pub mod report;
pub mod savings_goals;
mod store;
pub mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
