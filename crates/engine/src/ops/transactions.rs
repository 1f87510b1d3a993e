use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    EngineError, Money, ResultEngine, Store, StoreTx, Transaction, TransactionKind,
    util::normalize_optional_text,
};

use super::{CategoryIndex, Engine, with_tx};

/// Input for [`Engine::create_transaction`].
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
}

impl<S: Store> Engine<S> {
    /// Most recent transactions first, each with its category snapshot.
    pub async fn list_transactions(&self, limit: Option<u64>) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |tx| {
            let index = CategoryIndex::load(&mut tx).await?;
            let mut transactions = tx.transactions(limit).await?;
            for transaction in &mut transactions {
                index.enrich_transaction(transaction);
            }
            Ok(transactions)
        })
    }

    pub async fn create_transaction(&self, input: NewTransaction) -> ResultEngine<Transaction> {
        let mut transaction = Transaction::new(
            input.amount,
            normalize_optional_text(input.description.as_deref()),
            input.date.unwrap_or_else(Utc::now),
            input.kind,
            input.category_id,
            self.user_id.clone(),
        )?;

        with_tx!(self, |tx| {
            let index = CategoryIndex::load(&mut tx).await?;
            if let Some(category_id) = transaction.category_id
                && !index.contains(category_id)
            {
                return Err(EngineError::Validation(format!(
                    "category not found: {category_id}"
                )));
            }
            tx.insert_transaction(&transaction).await?;
            index.enrich_transaction(&mut transaction);
            tracing::debug!(
                id = %transaction.id,
                kind = transaction.kind.as_str(),
                "transaction created"
            );
            Ok(transaction)
        })
    }
}
