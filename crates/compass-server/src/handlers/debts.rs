//! Debt handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{get_user_email, AppError, AppState};
use compass_core::finance::{compare, StrategyComparison};
use compass_core::models::{Debt, DebtStatus, NewDebt};

/// Query parameters for the strategy comparison
#[derive(Debug, Deserialize)]
pub struct StrategiesQuery {
    /// Extra monthly budget directed at the head of the payoff order
    #[serde(default)]
    pub extra_cents: i64,
    /// Comma-separated debt IDs to leave out of the simulation
    pub exclude: Option<String>,
}

/// Request body for a status update
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: DebtStatus,
}

/// Request body for recording a payment
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount_cents: i64,
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

/// GET /api/debts - List all debts
pub async fn list_debts(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<Debt>>, AppError> {
    let user_email = get_user_email(request.headers());

    let debts = state.db.list_debts()?;

    // Audit log - read access
    state.db.log_audit(
        &user_email,
        "list",
        Some("debt"),
        None,
        Some(&format!("count={}", debts.len())),
    )?;

    Ok(Json(debts))
}

/// POST /api/debts - Create a debt
pub async fn create_debt(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<NewDebt>,
) -> Result<Json<Debt>, AppError> {
    let user_email = get_user_email(&headers);

    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("Debt name is required"));
    }

    let id = state.db.insert_debt(&body).map_err(AppError::from_core)?;
    let debt = state
        .db
        .get_debt(id)?
        .ok_or_else(|| AppError::internal("Debt vanished after creation"))?;

    // Audit log
    state
        .db
        .log_audit(&user_email, "create", Some("debt"), Some(id), None)?;

    Ok(Json(debt))
}

/// GET /api/debts/strategies - Avalanche vs snowball comparison
pub async fn debt_strategies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StrategiesQuery>,
    request: Request,
) -> Result<Json<StrategyComparison>, AppError> {
    let user_email = get_user_email(request.headers());

    if params.extra_cents < 0 {
        return Err(AppError::bad_request("extra_cents cannot be negative"));
    }

    let excluded_ids = parse_excluded(params.exclude.as_deref())?;
    let debts = state.db.list_debts()?;
    let comparison = compare(&debts, params.extra_cents, &excluded_ids);

    // Audit log - read access
    state.db.log_audit(
        &user_email,
        "simulate",
        Some("debt"),
        None,
        Some(&format!(
            "extra_cents={}, excluded={}, recommendation={}",
            params.extra_cents,
            excluded_ids.len(),
            comparison.recommendation
        )),
    )?;

    Ok(Json(comparison))
}

/// PUT /api/debts/:id/status - Update a debt's lifecycle status
pub async fn update_debt_status(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Debt>, AppError> {
    let user_email = get_user_email(&headers);

    state
        .db
        .update_debt_status(id, body.status)
        .map_err(AppError::from_core)?;
    let debt = state
        .db
        .get_debt(id)?
        .ok_or_else(|| AppError::not_found("Debt not found"))?;

    // Audit log
    state.db.log_audit(
        &user_email,
        "update",
        Some("debt"),
        Some(id),
        Some(&format!("status={}", body.status)),
    )?;

    Ok(Json(debt))
}

/// POST /api/debts/:id/payments - Record a payment against a debt
pub async fn record_debt_payment(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<PaymentRequest>,
) -> Result<Json<Debt>, AppError> {
    let user_email = get_user_email(&headers);

    let date = body.date.unwrap_or_else(|| Utc::now().date_naive());
    let debt = state
        .db
        .apply_debt_payment(id, body.amount_cents, date)
        .map_err(AppError::from_core)?;

    // Audit log
    state.db.log_audit(
        &user_email,
        "payment",
        Some("debt"),
        Some(id),
        Some(&format!("amount_cents={}", body.amount_cents)),
    )?;

    Ok(Json(debt))
}

fn parse_excluded(raw: Option<&str>) -> Result<Vec<i64>, AppError> {
    let Some(raw) = raw else {
        return Ok(vec![]);
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::bad_request("exclude must be comma-separated debt IDs"))
        })
        .collect()
}
