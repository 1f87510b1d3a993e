//! Storage-agnostic persistence contract.
//!
//! The [`Engine`](crate::Engine) only talks to a [`Store`]. Every operation
//! opens one [`StoreTx`], performs row-level reads and writes through it and
//! calls [`StoreTx::commit`]. A transaction dropped without commit leaves the
//! store untouched.
//!
//! Ordered reads follow the same contract in every adapter:
//!
//! - categories: name ascending, then id
//! - transactions: date descending, then id descending
//! - budgets and savings goals: creation time descending, then id descending
//!
//! `limit` is applied after ordering.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    Budget, BudgetCategory, Category, ResultEngine, SavingsGoal, Transaction, TransactionKind,
};

mod local;
mod relational;

pub use local::LocalStore;
pub use relational::RelationalStore;

#[async_trait]
pub trait Store: Send + Sync + 'static {
    type Tx: StoreTx;

    /// Open a new unit of work.
    async fn begin(&self) -> ResultEngine<Self::Tx>;

    /// Short backend name reported by health checks.
    fn backend(&self) -> &'static str;
}

#[async_trait]
pub trait StoreTx: Send {
    async fn categories(&mut self, kind: Option<TransactionKind>) -> ResultEngine<Vec<Category>>;
    async fn category(&mut self, id: Uuid) -> ResultEngine<Option<Category>>;
    async fn count_categories(&mut self) -> ResultEngine<u64>;
    async fn insert_category(&mut self, category: &Category) -> ResultEngine<()>;

    async fn transactions(&mut self, limit: Option<u64>) -> ResultEngine<Vec<Transaction>>;
    async fn count_transactions(&mut self) -> ResultEngine<u64>;
    async fn insert_transaction(&mut self, transaction: &Transaction) -> ResultEngine<()>;

    async fn budgets(&mut self, limit: Option<u64>) -> ResultEngine<Vec<Budget>>;
    async fn budget(&mut self, id: Uuid) -> ResultEngine<Option<Budget>>;
    async fn insert_budget(&mut self, budget: &Budget) -> ResultEngine<()>;
    /// Returns `false` when no budget has this id.
    async fn update_budget(&mut self, budget: &Budget) -> ResultEngine<bool>;
    /// Deletes the header only. Allocations must be removed first.
    async fn delete_budget(&mut self, id: Uuid) -> ResultEngine<bool>;

    /// Allocations of one budget, id ascending.
    async fn budget_categories(&mut self, budget_id: Uuid) -> ResultEngine<Vec<BudgetCategory>>;
    async fn insert_budget_category(&mut self, allocation: &BudgetCategory) -> ResultEngine<()>;
    /// Returns the number of rows removed.
    async fn delete_budget_categories(&mut self, budget_id: Uuid) -> ResultEngine<u64>;

    async fn savings_goals(&mut self, limit: Option<u64>) -> ResultEngine<Vec<SavingsGoal>>;
    async fn savings_goal(&mut self, id: Uuid) -> ResultEngine<Option<SavingsGoal>>;
    async fn insert_savings_goal(&mut self, goal: &SavingsGoal) -> ResultEngine<()>;
    async fn update_savings_goal(&mut self, goal: &SavingsGoal) -> ResultEngine<bool>;
    async fn delete_savings_goal(&mut self, id: Uuid) -> ResultEngine<bool>;

    async fn preference(&mut self, key: &str) -> ResultEngine<Option<String>>;
    async fn set_preference(&mut self, key: &str, value: &str) -> ResultEngine<()>;

    /// Make every write of this transaction durable and visible.
    async fn commit(self) -> ResultEngine<()>;
}
