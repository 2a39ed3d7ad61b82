//! Command implementations
//!
//! Organized by area:
//! - `core` - open_db, init, status, serve, apr
//! - `money` - accounts, recurring items, transactions
//! - `debts` - debt management and payoff plans
//! - `decision` - today's directive

mod core;
mod debts;
mod decision;
mod money;

pub use core::*;
pub use debts::*;
pub use decision::*;
pub use money::*;

use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Convert a dollar amount from the command line to integer cents
pub(crate) fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Render integer cents as dollars
pub(crate) fn fmt_cents(cents: i64) -> String {
    if cents < 0 {
        format!("-${:.2}", (-cents) as f64 / 100.0)
    } else {
        format!("${:.2}", cents as f64 / 100.0)
    }
}

/// Parse a YYYY-MM-DD argument
pub(crate) fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Invalid date '{}' (expected YYYY-MM-DD)", raw),
    }
}
