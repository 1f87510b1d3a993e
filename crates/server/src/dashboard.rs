use api_types::{ListQuery, dashboard::Dashboard};
use axum::{Json, extract::State};
use engine::Store;

use crate::{ServerError, extract::ApiQuery, mapping::dashboard_view, server::ServerState};

/// `?limit=` sets how many recent transactions the figures cover.
pub async fn get<S: Store>(
    State(state): State<ServerState<S>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Dashboard>, ServerError> {
    let dashboard = state.engine.dashboard(query.limit).await?;
    Ok(Json(dashboard_view(dashboard)))
}
