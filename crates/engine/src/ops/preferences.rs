use crate::{Currency, ResultEngine, Store, StoreTx, preferences::CURRENCY_KEY};

use super::{Engine, with_tx};

impl<S: Store> Engine<S> {
    /// Display currency chosen by the user, or the configured default.
    pub async fn currency_preference(&self) -> ResultEngine<Currency> {
        with_tx!(self, |tx| {
            let stored = tx.preference(CURRENCY_KEY).await?;
            Ok(self.resolve_currency(stored.as_deref()))
        })
    }

    pub async fn set_currency_preference(&self, code: &str) -> ResultEngine<Currency> {
        let currency = Currency::try_from(code)?;
        with_tx!(self, |tx| {
            tx.set_preference(CURRENCY_KEY, currency.code()).await?;
            tracing::info!(currency = currency.code(), "currency preference updated");
            Ok(currency)
        })
    }

    pub(super) fn resolve_currency(&self, stored: Option<&str>) -> Currency {
        stored
            .and_then(Currency::from_code)
            .unwrap_or(self.default_currency)
    }
}
