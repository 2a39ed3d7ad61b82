//! Calculator tool handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{get_user_email, AppError, AppState};
use compass_core::finance::estimate_apr as estimate_apr_from_terms;

/// Request body for APR estimation
#[derive(Debug, Deserialize)]
pub struct EstimateAprRequest {
    pub principal_cents: i64,
    pub monthly_payment_cents: i64,
    pub term_months: u32,
}

/// Response for a resolved APR
#[derive(Serialize)]
pub struct EstimateAprResponse {
    pub apr_percent: f64,
}

/// POST /api/tools/estimate-apr - Recover an APR from loan terms
///
/// Responds 422 "unresolvable" when no non-negative rate fits the terms;
/// that is an answer about the loan, not a server fault.
pub async fn estimate_apr(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<EstimateAprRequest>,
) -> Result<Json<EstimateAprResponse>, AppError> {
    let user_email = get_user_email(&headers);

    let apr = estimate_apr_from_terms(
        body.principal_cents,
        body.monthly_payment_cents,
        body.term_months,
    );

    // Audit log
    state.db.log_audit(
        &user_email,
        "estimate",
        Some("apr"),
        None,
        Some(&format!(
            "principal_cents={}, term_months={}, resolved={}",
            body.principal_cents,
            body.term_months,
            apr.is_some()
        )),
    )?;

    match apr {
        Some(apr_percent) => Ok(Json(EstimateAprResponse { apr_percent })),
        None => Err(AppError::unprocessable("unresolvable")),
    }
}
