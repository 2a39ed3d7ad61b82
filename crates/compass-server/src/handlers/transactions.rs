//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user_email, AppError, AppState, MAX_PAGE_LIMIT};
use compass_core::models::{NewTransaction, Transaction};

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/transactions - List recent transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTransactionsQuery>,
    request: Request,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let user_email = get_user_email(request.headers());

    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let transactions = state.db.list_transactions(limit)?;

    // Audit log - read access
    state.db.log_audit(
        &user_email,
        "list",
        Some("transaction"),
        None,
        Some(&format!("limit={}, count={}", limit, transactions.len())),
    )?;

    Ok(Json(transactions))
}

/// POST /api/transactions - Record a transaction manually
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<NewTransaction>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_email = get_user_email(&headers);

    let id = state
        .db
        .insert_transaction(&body)
        .map_err(AppError::from_core)?;

    // Audit log
    state.db.log_audit(
        &user_email,
        "create",
        Some("transaction"),
        Some(id),
        Some(&format!(
            "kind={}, amount_cents={}",
            body.kind, body.amount_cents
        )),
    )?;

    Ok(Json(serde_json::json!({ "id": id })))
}
