//! Budgets API endpoints

use api_types::{
    ListQuery, Success,
    budget::{Budget, BudgetInput as ApiBudgetInput},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{AllocationInput, BudgetInput, Store};

use crate::{
    ServerError,
    extract::{ApiJson, ApiQuery},
    mapping::{budget_view, parse_amount, parse_id, period_from_api},
    server::ServerState,
};

fn budget_input(payload: ApiBudgetInput) -> Result<BudgetInput, ServerError> {
    let categories = payload
        .categories
        .iter()
        .map(|allocation| {
            Ok(AllocationInput {
                category_id: allocation.category_id,
                amount: parse_amount(&allocation.amount)?,
            })
        })
        .collect::<Result<Vec<_>, ServerError>>()?;

    Ok(BudgetInput {
        name: payload.name,
        amount: parse_amount(&payload.amount)?,
        period: period_from_api(payload.period),
        start_date: payload.start_date,
        end_date: payload.end_date,
        categories,
    })
}

/// Lists budgets, most recently created first.
pub async fn list<S: Store>(
    State(state): State<ServerState<S>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Budget>>, ServerError> {
    let budgets = state.engine.list_budgets(query.limit).await?;
    Ok(Json(budgets.into_iter().map(budget_view).collect()))
}

pub async fn get<S: Store>(
    State(state): State<ServerState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Budget>, ServerError> {
    let id = parse_id(&id, "budget")?;
    let budget = state.engine.budget(id).await?;
    Ok(Json(budget_view(budget)))
}

pub async fn create<S: Store>(
    State(state): State<ServerState<S>>,
    ApiJson(payload): ApiJson<ApiBudgetInput>,
) -> Result<(StatusCode, Json<Budget>), ServerError> {
    let budget = state.engine.create_budget(budget_input(payload)?).await?;
    Ok((StatusCode::CREATED, Json(budget_view(budget))))
}

/// Replaces the budget and all of its category allocations.
pub async fn update<S: Store>(
    State(state): State<ServerState<S>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ApiBudgetInput>,
) -> Result<Json<Budget>, ServerError> {
    let id = parse_id(&id, "budget")?;
    let budget = state
        .engine
        .update_budget(id, budget_input(payload)?)
        .await?;
    Ok(Json(budget_view(budget)))
}

pub async fn delete<S: Store>(
    State(state): State<ServerState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Success>, ServerError> {
    let id = parse_id(&id, "budget")?;
    state.engine.delete_budget(id).await?;
    Ok(Json(Success { success: true }))
}
