//! The daily decision: rule engine and cached state lifecycle
//!
//! `engine` turns a financial snapshot into a risk-tiered directive;
//! `cache` persists one directive per user per UTC day with expiry and
//! locking semantics.

use serde::Serialize;

use crate::models::{
    Account, CommandType, Debt, NextAction, PrimaryCommand, RecurringItem, RiskLevel,
};

pub mod cache;
pub mod engine;

pub use cache::{acknowledge, current_decision, DecisionOutcome};
pub use engine::{cash_metrics, evaluate, CashMetrics};

/// Everything the rule engine needs to know about a user's finances,
/// fully materialized. The persistence layer assembles one per evaluation;
/// the engine itself never touches storage.
#[derive(Debug, Clone)]
pub struct FinancialSnapshot {
    pub accounts: Vec<Account>,
    /// Sum of expense transactions over the trailing 30 days
    pub expenses_30d_cents: i64,
    pub recurring: Vec<RecurringItem>,
    pub debts: Vec<Debt>,
}

/// A freshly evaluated decision, before persistence
#[derive(Debug, Clone, Serialize)]
pub struct ComputedDecision {
    pub risk_level: RiskLevel,
    pub primary_command: PrimaryCommand,
    pub warnings: Vec<String>,
    pub next_action: NextAction,
    pub basis: serde_json::Value,
}

impl ComputedDecision {
    /// Convenience accessor used by tests and the CLI
    pub fn command_type(&self) -> CommandType {
        self.primary_command.command_type
    }
}
