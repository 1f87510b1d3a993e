use chrono::Utc;
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine, Store, StoreTx, TransactionKind,
    categories::DEFAULT_CATEGORIES,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, not_found, with_tx};

/// Input for [`Engine::create_category`].
#[derive(Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub kind: TransactionKind,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl<S: Store> Engine<S> {
    /// List categories sorted by name, seeding the defaults into an empty
    /// store first.
    pub async fn list_categories(
        &self,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |tx| {
            seed_default_categories(&mut tx).await?;
            tx.categories(kind).await
        })
    }

    pub async fn category(&self, id: Uuid) -> ResultEngine<Category> {
        with_tx!(self, |tx| {
            tx.category(id)
                .await?
                .ok_or_else(|| not_found("category", id))
        })
    }

    /// Create a category. Names are unique within a kind, compared
    /// case-insensitively.
    pub async fn create_category(&self, input: NewCategory) -> ResultEngine<Category> {
        let name = normalize_required_name(&input.name, "category")?;

        with_tx!(self, |tx| {
            let existing = tx.categories(Some(input.kind)).await?;
            if existing.iter().any(|c| c.name.eq_ignore_ascii_case(&name)) {
                return Err(EngineError::Conflict(format!(
                    "{} category '{name}' already exists",
                    input.kind.as_str().to_lowercase()
                )));
            }

            let category = Category {
                id: Uuid::now_v7(),
                name,
                kind: input.kind,
                color: normalize_optional_text(input.color.as_deref()),
                icon: normalize_optional_text(input.icon.as_deref()),
                description: normalize_optional_text(input.description.as_deref()),
                created_at: Utc::now(),
            };
            tx.insert_category(&category).await?;
            Ok(category)
        })
    }
}

async fn seed_default_categories<T: StoreTx>(tx: &mut T) -> ResultEngine<()> {
    if tx.count_categories().await? > 0 {
        return Ok(());
    }
    for default in &DEFAULT_CATEGORIES {
        tx.insert_category(&default.to_category()).await?;
    }
    tracing::debug!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(())
}
