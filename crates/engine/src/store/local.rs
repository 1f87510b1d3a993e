use std::{
    cmp::Reverse,
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{Store, StoreTx};
use crate::{
    Budget, BudgetCategory, Category, EngineError, ResultEngine, SavingsGoal, Transaction,
    TransactionKind,
};

/// Everything the offline build persists for one device, one array per
/// entity.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Document {
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    budget_categories: Vec<BudgetCategory>,
    savings_goals: Vec<SavingsGoal>,
    preferences: BTreeMap<String, String>,
}

/// Single-user backend over a JSON file.
///
/// The whole document is held in memory. A transaction works on a private
/// copy; [`StoreTx::commit`] writes it to disk (temp file + rename) and then
/// publishes it. Transactions are serialized by the document lock.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    document: Arc<Mutex<Document>>,
}

impl LocalStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            document: Arc::new(Mutex::new(Document::default())),
        }
    }

    /// Open (or lazily create) the store file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> ResultEngine<Self> {
        let path = path.as_ref().to_path_buf();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(EngineError::storage)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "local store file missing, starting empty");
                Document::default()
            }
            Err(err) => return Err(EngineError::storage(err)),
        };
        Ok(Self {
            path: Some(path),
            document: Arc::new(Mutex::new(document)),
        })
    }
}

#[async_trait]
impl Store for LocalStore {
    type Tx = LocalTx;

    async fn begin(&self) -> ResultEngine<LocalTx> {
        let guard = Arc::clone(&self.document).lock_owned().await;
        let working = guard.clone();
        Ok(LocalTx {
            guard,
            working,
            path: self.path.clone(),
        })
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

pub struct LocalTx {
    guard: OwnedMutexGuard<Document>,
    working: Document,
    path: Option<PathBuf>,
}

fn take<T>(items: impl Iterator<Item = T>, limit: Option<u64>) -> Vec<T> {
    match limit {
        Some(limit) => items
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect(),
        None => items.collect(),
    }
}

async fn persist(path: &Path, document: &Document) -> ResultEngine<()> {
    let bytes = serde_json::to_vec_pretty(document).map_err(EngineError::storage)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(EngineError::storage)?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(EngineError::storage)?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(EngineError::storage)?;
    Ok(())
}

#[async_trait]
impl StoreTx for LocalTx {
    async fn categories(&mut self, kind: Option<TransactionKind>) -> ResultEngine<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .working
            .categories
            .iter()
            .filter(|c| kind.is_none_or(|k| c.kind == k))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn category(&mut self, id: Uuid) -> ResultEngine<Option<Category>> {
        Ok(self.working.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn count_categories(&mut self) -> ResultEngine<u64> {
        Ok(self.working.categories.len() as u64)
    }

    async fn insert_category(&mut self, category: &Category) -> ResultEngine<()> {
        self.working.categories.push(category.clone());
        Ok(())
    }

    async fn transactions(&mut self, limit: Option<u64>) -> ResultEngine<Vec<Transaction>> {
        let mut transactions = self.working.transactions.clone();
        transactions.sort_by_key(|t| Reverse((t.date, t.id)));
        Ok(take(transactions.into_iter(), limit))
    }

    async fn count_transactions(&mut self) -> ResultEngine<u64> {
        Ok(self.working.transactions.len() as u64)
    }

    async fn insert_transaction(&mut self, transaction: &Transaction) -> ResultEngine<()> {
        self.working.transactions.push(transaction.clone());
        Ok(())
    }

    async fn budgets(&mut self, limit: Option<u64>) -> ResultEngine<Vec<Budget>> {
        let mut budgets = self.working.budgets.clone();
        budgets.sort_by_key(|b| Reverse((b.created_at, b.id)));
        Ok(take(budgets.into_iter(), limit))
    }

    async fn budget(&mut self, id: Uuid) -> ResultEngine<Option<Budget>> {
        Ok(self.working.budgets.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_budget(&mut self, budget: &Budget) -> ResultEngine<()> {
        let mut stored = budget.clone();
        stored.categories.clear();
        self.working.budgets.push(stored);
        Ok(())
    }

    async fn update_budget(&mut self, budget: &Budget) -> ResultEngine<bool> {
        let Some(slot) = self.working.budgets.iter_mut().find(|b| b.id == budget.id) else {
            return Ok(false);
        };
        *slot = Budget {
            categories: Vec::new(),
            ..budget.clone()
        };
        Ok(true)
    }

    async fn delete_budget(&mut self, id: Uuid) -> ResultEngine<bool> {
        let before = self.working.budgets.len();
        self.working.budgets.retain(|b| b.id != id);
        Ok(self.working.budgets.len() != before)
    }

    async fn budget_categories(&mut self, budget_id: Uuid) -> ResultEngine<Vec<BudgetCategory>> {
        let mut allocations: Vec<BudgetCategory> = self
            .working
            .budget_categories
            .iter()
            .filter(|a| a.budget_id == budget_id)
            .cloned()
            .collect();
        allocations.sort_by_key(|a| a.id);
        Ok(allocations)
    }

    async fn insert_budget_category(&mut self, allocation: &BudgetCategory) -> ResultEngine<()> {
        let mut stored = allocation.clone();
        stored.category = None;
        self.working.budget_categories.push(stored);
        Ok(())
    }

    async fn delete_budget_categories(&mut self, budget_id: Uuid) -> ResultEngine<u64> {
        let before = self.working.budget_categories.len();
        self.working
            .budget_categories
            .retain(|a| a.budget_id != budget_id);
        Ok((before - self.working.budget_categories.len()) as u64)
    }

    async fn savings_goals(&mut self, limit: Option<u64>) -> ResultEngine<Vec<SavingsGoal>> {
        let mut goals = self.working.savings_goals.clone();
        goals.sort_by_key(|g| Reverse((g.created_at, g.id)));
        Ok(take(goals.into_iter(), limit))
    }

    async fn savings_goal(&mut self, id: Uuid) -> ResultEngine<Option<SavingsGoal>> {
        Ok(self.working.savings_goals.iter().find(|g| g.id == id).cloned())
    }

    async fn insert_savings_goal(&mut self, goal: &SavingsGoal) -> ResultEngine<()> {
        self.working.savings_goals.push(goal.clone());
        Ok(())
    }

    async fn update_savings_goal(&mut self, goal: &SavingsGoal) -> ResultEngine<bool> {
        let Some(slot) = self
            .working
            .savings_goals
            .iter_mut()
            .find(|g| g.id == goal.id)
        else {
            return Ok(false);
        };
        *slot = goal.clone();
        Ok(true)
    }

    async fn delete_savings_goal(&mut self, id: Uuid) -> ResultEngine<bool> {
        let before = self.working.savings_goals.len();
        self.working.savings_goals.retain(|g| g.id != id);
        Ok(self.working.savings_goals.len() != before)
    }

    async fn preference(&mut self, key: &str) -> ResultEngine<Option<String>> {
        Ok(self.working.preferences.get(key).cloned())
    }

    async fn set_preference(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        self.working
            .preferences
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn commit(self) -> ResultEngine<()> {
        let LocalTx {
            mut guard,
            working,
            path,
        } = self;
        if let Some(path) = path {
            persist(&path, &working).await?;
            tracing::debug!(path = %path.display(), "local store committed");
        }
        *guard = working;
        Ok(())
    }
}
