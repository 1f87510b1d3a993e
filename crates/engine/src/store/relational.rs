use async_trait::async_trait;
use sea_orm::{
    ActiveValue, DatabaseBackend, DatabaseConnection, DatabaseTransaction, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*, sea_query::OnConflict,
};
use uuid::Uuid;

use super::{Store, StoreTx};
use crate::{
    Budget, BudgetCategory, Category, ResultEngine, SavingsGoal, Transaction, TransactionKind,
    budget_categories, budgets, categories, preferences, savings_goals, transactions,
};

/// Server-side backend over a SeaORM connection.
#[derive(Clone, Debug)]
pub struct RelationalStore {
    database: DatabaseConnection,
}

impl RelationalStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Store for RelationalStore {
    type Tx = RelationalTx;

    async fn begin(&self) -> ResultEngine<RelationalTx> {
        let tx = self.database.begin().await?;
        Ok(RelationalTx { tx })
    }

    fn backend(&self) -> &'static str {
        match self.database.get_database_backend() {
            DatabaseBackend::Sqlite => "sqlite",
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::MySql => "mysql",
        }
    }
}

pub struct RelationalTx {
    tx: DatabaseTransaction,
}

fn convert<M, T>(models: Vec<M>) -> ResultEngine<Vec<T>>
where
    T: TryFrom<M, Error = crate::EngineError>,
{
    models.into_iter().map(T::try_from).collect()
}

/// SQL `LIMIT` binds as a signed 64-bit value; larger limits mean every row.
fn row_limit(limit: u64) -> u64 {
    limit.min(i64::MAX.unsigned_abs())
}

#[async_trait]
impl StoreTx for RelationalTx {
    async fn categories(&mut self, kind: Option<TransactionKind>) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id);
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        convert(query.all(&self.tx).await?)
    }

    async fn category(&mut self, id: Uuid) -> ResultEngine<Option<Category>> {
        categories::Entity::find_by_id(id)
            .one(&self.tx)
            .await?
            .map(Category::try_from)
            .transpose()
    }

    async fn count_categories(&mut self) -> ResultEngine<u64> {
        Ok(categories::Entity::find().count(&self.tx).await?)
    }

    async fn insert_category(&mut self, category: &Category) -> ResultEngine<()> {
        categories::ActiveModel::from(category)
            .insert(&self.tx)
            .await?;
        Ok(())
    }

    async fn transactions(&mut self, limit: Option<u64>) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .order_by_desc(transactions::Column::Date)
            .order_by_desc(transactions::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(row_limit(limit));
        }
        convert(query.all(&self.tx).await?)
    }

    async fn count_transactions(&mut self) -> ResultEngine<u64> {
        Ok(transactions::Entity::find().count(&self.tx).await?)
    }

    async fn insert_transaction(&mut self, transaction: &Transaction) -> ResultEngine<()> {
        transactions::ActiveModel::from(transaction)
            .insert(&self.tx)
            .await?;
        Ok(())
    }

    async fn budgets(&mut self, limit: Option<u64>) -> ResultEngine<Vec<Budget>> {
        let mut query = budgets::Entity::find()
            .order_by_desc(budgets::Column::CreatedAt)
            .order_by_desc(budgets::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(row_limit(limit));
        }
        convert(query.all(&self.tx).await?)
    }

    async fn budget(&mut self, id: Uuid) -> ResultEngine<Option<Budget>> {
        budgets::Entity::find_by_id(id)
            .one(&self.tx)
            .await?
            .map(Budget::try_from)
            .transpose()
    }

    async fn insert_budget(&mut self, budget: &Budget) -> ResultEngine<()> {
        budgets::ActiveModel::from(budget).insert(&self.tx).await?;
        Ok(())
    }

    async fn update_budget(&mut self, budget: &Budget) -> ResultEngine<bool> {
        let mut active = budgets::ActiveModel::from(budget);
        active.id = ActiveValue::NotSet;
        let result = budgets::Entity::update_many()
            .set(active)
            .filter(budgets::Column::Id.eq(budget.id))
            .exec(&self.tx)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_budget(&mut self, id: Uuid) -> ResultEngine<bool> {
        let result = budgets::Entity::delete_by_id(id).exec(&self.tx).await?;
        Ok(result.rows_affected > 0)
    }

    async fn budget_categories(&mut self, budget_id: Uuid) -> ResultEngine<Vec<BudgetCategory>> {
        let models = budget_categories::Entity::find()
            .filter(budget_categories::Column::BudgetId.eq(budget_id))
            .order_by_asc(budget_categories::Column::Id)
            .all(&self.tx)
            .await?;
        convert(models)
    }

    async fn insert_budget_category(&mut self, allocation: &BudgetCategory) -> ResultEngine<()> {
        budget_categories::ActiveModel::from(allocation)
            .insert(&self.tx)
            .await?;
        Ok(())
    }

    async fn delete_budget_categories(&mut self, budget_id: Uuid) -> ResultEngine<u64> {
        let result = budget_categories::Entity::delete_many()
            .filter(budget_categories::Column::BudgetId.eq(budget_id))
            .exec(&self.tx)
            .await?;
        Ok(result.rows_affected)
    }

    async fn savings_goals(&mut self, limit: Option<u64>) -> ResultEngine<Vec<SavingsGoal>> {
        let mut query = savings_goals::Entity::find()
            .order_by_desc(savings_goals::Column::CreatedAt)
            .order_by_desc(savings_goals::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(row_limit(limit));
        }
        convert(query.all(&self.tx).await?)
    }

    async fn savings_goal(&mut self, id: Uuid) -> ResultEngine<Option<SavingsGoal>> {
        savings_goals::Entity::find_by_id(id)
            .one(&self.tx)
            .await?
            .map(SavingsGoal::try_from)
            .transpose()
    }

    async fn insert_savings_goal(&mut self, goal: &SavingsGoal) -> ResultEngine<()> {
        savings_goals::ActiveModel::from(goal)
            .insert(&self.tx)
            .await?;
        Ok(())
    }

    async fn update_savings_goal(&mut self, goal: &SavingsGoal) -> ResultEngine<bool> {
        let mut active = savings_goals::ActiveModel::from(goal);
        active.id = ActiveValue::NotSet;
        let result = savings_goals::Entity::update_many()
            .set(active)
            .filter(savings_goals::Column::Id.eq(goal.id))
            .exec(&self.tx)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_savings_goal(&mut self, id: Uuid) -> ResultEngine<bool> {
        let result = savings_goals::Entity::delete_by_id(id)
            .exec(&self.tx)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn preference(&mut self, key: &str) -> ResultEngine<Option<String>> {
        Ok(preferences::Entity::find_by_id(key.to_string())
            .one(&self.tx)
            .await?
            .map(|model| model.value))
    }

    async fn set_preference(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        let active = preferences::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value.to_string()),
        };
        preferences::Entity::insert(active)
            .on_conflict(
                OnConflict::column(preferences::Column::Key)
                    .update_column(preferences::Column::Value)
                    .to_owned(),
            )
            .exec(&self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self) -> ResultEngine<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
