//! Transactions API endpoints

use api_types::{
    ListQuery,
    transaction::{Transaction, TransactionNew},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{NewTransaction, Store};

use crate::{
    ServerError,
    extract::{ApiJson, ApiQuery},
    mapping::{kind_from_api, parse_amount, transaction_view},
    server::ServerState,
};

/// Lists transactions, newest date first.
pub async fn list<S: Store>(
    State(state): State<ServerState<S>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Transaction>>, ServerError> {
    let transactions = state.engine.list_transactions(query.limit).await?;
    Ok(Json(
        transactions.into_iter().map(transaction_view).collect(),
    ))
}

pub async fn create<S: Store>(
    State(state): State<ServerState<S>>,
    ApiJson(payload): ApiJson<TransactionNew>,
) -> Result<(StatusCode, Json<Transaction>), ServerError> {
    let transaction = state
        .engine
        .create_transaction(NewTransaction {
            amount: parse_amount(&payload.amount)?,
            kind: kind_from_api(payload.kind),
            description: payload.description,
            date: payload.date,
            category_id: payload.category_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(transaction_view(transaction))))
}
