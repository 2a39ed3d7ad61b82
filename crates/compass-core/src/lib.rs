//! Compass Core Library
//!
//! Shared functionality for the Compass daily money directive tool:
//! - Database access and migrations
//! - Amortization, APR recovery, and debt payoff strategy simulation
//! - The daily decision rule engine and its cached state lifecycle

pub mod db;
pub mod decision;
pub mod error;
pub mod finance;
pub mod models;

pub use db::{AuditEntry, Database};
pub use decision::{
    acknowledge, cash_metrics, current_decision, evaluate, CashMetrics, ComputedDecision,
    DecisionOutcome, FinancialSnapshot,
};
pub use error::{Error, Result};
pub use finance::{
    compare, estimate_apr, minimum_only_payoff, monthly_payment, recommend, simulate,
    total_interest, DebtPayoffPlan, DebtStrategy, MinimumOnlyPayoff, PayoffHorizon,
    StrategyComparison, MAX_PAYOFF_MONTHS,
};
