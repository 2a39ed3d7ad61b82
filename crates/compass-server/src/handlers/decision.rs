//! Daily decision handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{get_user_email, AppError, AppState, MAX_PAGE_LIMIT};
use compass_core::decision::{acknowledge, current_decision};
use compass_core::models::DecisionState;

/// The current decision plus whether this request computed it
#[derive(Serialize)]
pub struct DecisionResponse {
    #[serde(flatten)]
    pub decision: DecisionState,
    pub is_new: bool,
}

/// Query parameters for decision history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_history_limit() -> i64 {
    30
}

/// GET /api/decision - Today's directive for the calling user
///
/// Returns the cached decision while it is valid; computes, persists and
/// returns a fresh one otherwise.
pub async fn get_decision(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<DecisionResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    let outcome = current_decision(&state.db, &user_email, Utc::now())?;

    // Audit log - read access (and possibly a compute)
    state.db.log_audit(
        &user_email,
        if outcome.is_new { "compute" } else { "view" },
        Some("decision"),
        Some(outcome.decision.id),
        Some(&format!(
            "risk={}, command={}",
            outcome.decision.risk_level, outcome.decision.primary_command.command_type
        )),
    )?;

    Ok(Json(DecisionResponse {
        decision: outcome.decision,
        is_new: outcome.is_new,
    }))
}

/// POST /api/decision/:id/acknowledge - Mark a decision as seen
pub async fn acknowledge_decision(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<DecisionState>, AppError> {
    let user_email = get_user_email(request.headers());

    let decision = acknowledge(&state.db, id, Utc::now()).map_err(AppError::from_core)?;

    // Audit log
    state
        .db
        .log_audit(&user_email, "acknowledge", Some("decision"), Some(id), None)?;

    Ok(Json(decision))
}

/// GET /api/decision/history - Past decisions, locked ones included
pub async fn decision_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
    request: Request,
) -> Result<Json<Vec<DecisionState>>, AppError> {
    let user_email = get_user_email(request.headers());

    let limit = params.limit.clamp(1, MAX_PAGE_LIMIT);
    let decisions = state.db.list_decisions(&user_email, limit)?;

    // Audit log - read access
    state.db.log_audit(
        &user_email,
        "list",
        Some("decision"),
        None,
        Some(&format!("count={}", decisions.len())),
    )?;

    Ok(Json(decisions))
}
