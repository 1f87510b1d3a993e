use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    BudgetCategory, Category, Currency, EngineError, ResultEngine, Store, StoreTx, Transaction,
};

mod budgets;
mod categories;
mod dashboard;
mod preferences;
mod savings_goals;
mod transactions;

pub use budgets::{AllocationInput, BudgetInput};
pub use categories::NewCategory;
pub use dashboard::{Dashboard, Health};
pub use savings_goals::{NewSavingsGoal, SavingsGoalUpdate};
pub use transactions::NewTransaction;

pub const DEFAULT_USER_ID: &str = "default-user";

/// Run a block inside a store transaction, committing on success.
///
/// An early return through `?` drops the transaction, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let mut $tx = $self.store.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine<S: Store> {
    store: S,
    user_id: String,
    default_currency: Currency,
}

impl<S: Store> Engine<S> {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder<S> {
        EngineBuilder::default()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Category lookup used to attach snapshots on read.
struct CategoryIndex(HashMap<Uuid, Category>);

impl CategoryIndex {
    async fn load<T: StoreTx>(tx: &mut T) -> ResultEngine<Self> {
        let categories = tx.categories(None).await?;
        Ok(Self(categories.into_iter().map(|c| (c.id, c)).collect()))
    }

    fn enrich_transaction(&self, transaction: &mut Transaction) {
        transaction.category = transaction
            .category_id
            .and_then(|id| self.0.get(&id))
            .map(Category::snapshot);
    }

    fn enrich_allocation(&self, allocation: &mut BudgetCategory) {
        allocation.category = self.0.get(&allocation.category_id).map(Category::snapshot);
    }

    fn contains(&self, id: Uuid) -> bool {
        self.0.contains_key(&id)
    }
}

fn not_found(label: &str, id: Uuid) -> EngineError {
    EngineError::NotFound(format!("{label} not found: {id}"))
}

/// The builder for `Engine`
pub struct EngineBuilder<S: Store> {
    store: Option<S>,
    user_id: String,
    default_currency: Currency,
}

impl<S: Store> Default for EngineBuilder<S> {
    fn default() -> Self {
        Self {
            store: None,
            user_id: DEFAULT_USER_ID.to_string(),
            default_currency: Currency::default(),
        }
    }
}

impl<S: Store> EngineBuilder<S> {
    /// Pass the required store
    pub fn store(mut self, store: S) -> EngineBuilder<S> {
        self.store = Some(store);
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> EngineBuilder<S> {
        self.user_id = user_id.into();
        self
    }

    /// Currency reported until the user picks one.
    pub fn default_currency(mut self, currency: Currency) -> EngineBuilder<S> {
        self.default_currency = currency;
        self
    }

    /// Construct `Engine`, checking that the store can open a transaction.
    pub async fn build(self) -> ResultEngine<Engine<S>> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Validation("engine store is required".to_string()))?;
        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(EngineError::Validation(
                "user id must not be empty".to_string(),
            ));
        }
        drop(store.begin().await?);
        tracing::debug!(backend = store.backend(), "engine ready");
        Ok(Engine {
            user_id: user_id.to_string(),
            store,
            default_currency: self.default_currency,
        })
    }
}
