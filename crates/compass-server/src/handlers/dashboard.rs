//! Dashboard handler

use std::sync::Arc;

use axum::{extract::Request, extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::{get_user_email, AppError, AppState};
use compass_core::decision::{cash_metrics, CashMetrics, FinancialSnapshot};
use compass_core::models::Account;

/// Dashboard summary: the cash metrics plus raw debt aggregates.
/// Debt totals here include every debt with a balance, even ones excluded
/// from payoff simulations elsewhere.
#[derive(Serialize)]
pub struct DashboardResponse {
    pub metrics: CashMetrics,
    pub accounts: Vec<Account>,
    pub active_debt_count: usize,
    pub debt_balance_cents: i64,
    pub minimum_payments_cents: i64,
}

/// GET /api/dashboard - Today's numbers at a glance
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<DashboardResponse>, AppError> {
    let user_email = get_user_email(request.headers());

    let today = Utc::now().date_naive();
    let snapshot = FinancialSnapshot::load(&state.db, today)?;
    let metrics = cash_metrics(&snapshot, today);

    let active: Vec<_> = snapshot.debts.iter().filter(|d| d.in_simulation()).collect();
    let response = DashboardResponse {
        metrics,
        active_debt_count: active.len(),
        debt_balance_cents: active.iter().map(|d| d.balance_cents).sum(),
        minimum_payments_cents: active
            .iter()
            .map(|d| d.minimum_payment_cents.unwrap_or(0))
            .sum(),
        accounts: snapshot.accounts,
    };

    // Audit log - read access
    state
        .db
        .log_audit(&user_email, "view", Some("dashboard"), None, None)?;

    Ok(Json(response))
}
