//! Categories API endpoints

use api_types::category::{Category, CategoryNew, CategoryQuery};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewCategory, Store};

use crate::{
    ServerError,
    extract::{ApiJson, ApiQuery},
    mapping::{category_view, kind_from_api, parse_id},
    server::ServerState,
};

/// Lists categories, seeding the defaults on first use.
pub async fn list<S: Store>(
    State(state): State<ServerState<S>>,
    ApiQuery(query): ApiQuery<CategoryQuery>,
) -> Result<Json<Vec<Category>>, ServerError> {
    let categories = state
        .engine
        .list_categories(query.kind.map(kind_from_api))
        .await?;
    Ok(Json(categories.into_iter().map(category_view).collect()))
}

pub async fn get<S: Store>(
    State(state): State<ServerState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ServerError> {
    let id = parse_id(&id, "category")?;
    let category = state.engine.category(id).await?;
    Ok(Json(category_view(category)))
}

pub async fn create<S: Store>(
    State(state): State<ServerState<S>>,
    ApiJson(payload): ApiJson<CategoryNew>,
) -> Result<(StatusCode, Json<Category>), ServerError> {
    let category = state
        .engine
        .create_category(NewCategory {
            name: payload.name,
            kind: kind_from_api(payload.kind),
            color: payload.color,
            icon: payload.icon,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(category_view(category))))
}
