//! Display currency preference

use api_types::currency::{CurrencyPreference, CurrencyUpdate};
use axum::{Json, extract::State};
use engine::{Currency, Store};

use crate::{ServerError, extract::ApiJson, mapping::currency_info, server::ServerState};

fn preference(currency: Currency) -> CurrencyPreference {
    CurrencyPreference {
        currency: currency_info(currency),
        available: Currency::all().iter().copied().map(currency_info).collect(),
    }
}

pub async fn get<S: Store>(
    State(state): State<ServerState<S>>,
) -> Result<Json<CurrencyPreference>, ServerError> {
    let currency = state.engine.currency_preference().await?;
    Ok(Json(preference(currency)))
}

pub async fn update<S: Store>(
    State(state): State<ServerState<S>>,
    ApiJson(payload): ApiJson<CurrencyUpdate>,
) -> Result<Json<CurrencyPreference>, ServerError> {
    let currency = state.engine.set_currency_preference(&payload.code).await?;
    Ok(Json(preference(currency)))
}
