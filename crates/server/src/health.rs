use api_types::health::Health;
use axum::{Json, extract::State};
use engine::Store;

use crate::{ServerError, server::ServerState};

pub async fn get<S: Store>(
    State(state): State<ServerState<S>>,
) -> Result<Json<Health>, ServerError> {
    let health = state.engine.health().await?;
    Ok(Json(Health {
        message: "Good!".to_string(),
        database: health.backend.to_string(),
        categories_count: health.categories_count,
        transactions_count: health.transactions_count,
        status: "ok".to_string(),
    }))
}
