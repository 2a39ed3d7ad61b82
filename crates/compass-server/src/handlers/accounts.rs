//! Account handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{get_user_email, AppError, AppState, SuccessResponse};
use compass_core::models::{Account, AccountType};

/// Request body for creating an account
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub balance_cents: i64,
}

/// Request body for updating a balance
#[derive(Debug, Deserialize)]
pub struct BalanceRequest {
    pub balance_cents: i64,
}

/// GET /api/accounts - List all accounts
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Account>>, AppError> {
    let user_email = get_user_email(request.headers());

    let accounts = state.db.list_accounts()?;

    // Audit log - read access
    state.db.log_audit(
        &user_email,
        "list",
        Some("account"),
        None,
        Some(&format!("count={}", accounts.len())),
    )?;

    Ok(Json(accounts))
}

/// POST /api/accounts - Create (or update by name) an account
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<CreateAccountRequest>,
) -> Result<Json<Account>, AppError> {
    let user_email = get_user_email(&headers);

    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Account name is required"));
    }

    let id = state
        .db
        .upsert_account(body.name.trim(), body.account_type, body.balance_cents)
        .map_err(AppError::from_core)?;
    let account = state
        .db
        .get_account(id)?
        .ok_or_else(|| AppError::internal("Account vanished after creation"))?;

    // Audit log
    state
        .db
        .log_audit(&user_email, "create", Some("account"), Some(id), None)?;

    Ok(Json(account))
}

/// PUT /api/accounts/:id/balance - Set an account balance
pub async fn set_account_balance(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<BalanceRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(&headers);

    state
        .db
        .set_account_balance(id, body.balance_cents)
        .map_err(AppError::from_core)?;

    // Audit log
    state.db.log_audit(
        &user_email,
        "update",
        Some("account"),
        Some(id),
        Some(&format!("balance_cents={}", body.balance_cents)),
    )?;

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/accounts/:id - Delete an account
pub async fn delete_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state
        .db
        .get_account(id)?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    state.db.delete_account(id)?;

    // Audit log
    state
        .db
        .log_audit(&user_email, "delete", Some("account"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
