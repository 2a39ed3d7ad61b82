//! Recurring item handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};

use crate::{get_user_email, AppError, AppState, SuccessResponse};
use compass_core::models::{NewRecurringItem, RecurringItem};

/// GET /api/recurring - List recurring income and bills
pub async fn list_recurring(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<RecurringItem>>, AppError> {
    let user_email = get_user_email(request.headers());

    let items = state.db.list_recurring()?;

    // Audit log - read access
    state.db.log_audit(
        &user_email,
        "list",
        Some("recurring"),
        None,
        Some(&format!("count={}", items.len())),
    )?;

    Ok(Json(items))
}

/// POST /api/recurring - Create a recurring item
pub async fn create_recurring(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<NewRecurringItem>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_email = get_user_email(&headers);

    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }

    let id = state
        .db
        .insert_recurring(&body)
        .map_err(AppError::from_core)?;

    // Audit log
    state.db.log_audit(
        &user_email,
        "create",
        Some("recurring"),
        Some(id),
        Some(&format!("kind={}, name={}", body.kind, body.name)),
    )?;

    Ok(Json(serde_json::json!({ "id": id })))
}

/// DELETE /api/recurring/:id - Delete a recurring item
pub async fn delete_recurring(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    state
        .db
        .delete_recurring(id)
        .map_err(AppError::from_core)?;

    // Audit log
    state
        .db
        .log_audit(&user_email, "delete", Some("recurring"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
