//! Savings goals API endpoints

use api_types::{
    ListQuery, Success,
    savings_goal::{SavingsGoal, SavingsGoalNew, SavingsGoalUpdate},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewSavingsGoal, Store};

use crate::{
    ServerError,
    extract::{ApiJson, ApiQuery},
    mapping::{parse_amount, parse_id, savings_goal_view, status_from_api},
    server::ServerState,
};

pub async fn list<S: Store>(
    State(state): State<ServerState<S>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<SavingsGoal>>, ServerError> {
    let goals = state.engine.list_savings_goals(query.limit).await?;
    Ok(Json(goals.into_iter().map(savings_goal_view).collect()))
}

pub async fn get<S: Store>(
    State(state): State<ServerState<S>>,
    Path(id): Path<String>,
) -> Result<Json<SavingsGoal>, ServerError> {
    let id = parse_id(&id, "savings goal")?;
    let goal = state.engine.savings_goal(id).await?;
    Ok(Json(savings_goal_view(goal)))
}

pub async fn create<S: Store>(
    State(state): State<ServerState<S>>,
    ApiJson(payload): ApiJson<SavingsGoalNew>,
) -> Result<(StatusCode, Json<SavingsGoal>), ServerError> {
    let current_amount = payload.current_amount.as_ref().map(parse_amount).transpose()?;
    let goal = state
        .engine
        .create_savings_goal(NewSavingsGoal {
            name: payload.name,
            target_amount: parse_amount(&payload.target_amount)?,
            current_amount,
            target_date: payload.target_date,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(savings_goal_view(goal))))
}

/// Full replacement: omitted optional fields are cleared.
pub async fn update<S: Store>(
    State(state): State<ServerState<S>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SavingsGoalUpdate>,
) -> Result<Json<SavingsGoal>, ServerError> {
    let id = parse_id(&id, "savings goal")?;
    let current_amount = payload.current_amount.as_ref().map(parse_amount).transpose()?;
    let goal = state
        .engine
        .update_savings_goal(
            id,
            engine::SavingsGoalUpdate {
                name: payload.name,
                target_amount: parse_amount(&payload.target_amount)?,
                current_amount,
                target_date: payload.target_date,
                description: payload.description,
                status: payload.status.map(status_from_api),
            },
        )
        .await?;
    Ok(Json(savings_goal_view(goal)))
}

pub async fn delete<S: Store>(
    State(state): State<ServerState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Success>, ServerError> {
    let id = parse_id(&id, "savings goal")?;
    state.engine.delete_savings_goal(id).await?;
    Ok(Json(Success { success: true }))
}
