//! Financial math: amortization, APR recovery, payoff strategy simulation
//!
//! Everything in this module is pure computation over integer cents. All
//! loops are deterministically bounded by named constants so a single call
//! can never run unbounded.

use serde::{Serialize, Serializer};

pub mod amortization;
pub mod apr;
pub mod strategy;

pub use amortization::{minimum_only_payoff, monthly_payment, total_interest, MinimumOnlyPayoff};
pub use apr::estimate_apr;
pub use strategy::{
    compare, recommend, simulate, DebtPayoffPlan, DebtStrategy, PlannedDebt, StrategyComparison,
};

/// Longest payoff horizon simulated: 600 monthly ticks (a 50-year loan,
/// beyond any realistic consumer debt). Simulations that are still carrying
/// a balance after this many months report [`PayoffHorizon::Never`].
pub const MAX_PAYOFF_MONTHS: u32 = 600;

/// How long a payoff takes, when it completes at all.
///
/// `Never` is an expected outcome (the payments do not retire the
/// principal), not an error. It serializes as JSON null so consumers render
/// "never" instead of crashing on a missing number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoffHorizon {
    Months(u32),
    Never,
}

impl PayoffHorizon {
    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Months(m) => Some(*m),
            Self::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }
}

impl Serialize for PayoffHorizon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Months(m) => serializer.serialize_u32(*m),
            Self::Never => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_serialization() {
        assert_eq!(
            serde_json::to_string(&PayoffHorizon::Months(36)).unwrap(),
            "36"
        );
        assert_eq!(serde_json::to_string(&PayoffHorizon::Never).unwrap(), "null");
    }

    #[test]
    fn test_horizon_accessors() {
        assert_eq!(PayoffHorizon::Months(12).months(), Some(12));
        assert_eq!(PayoffHorizon::Never.months(), None);
        assert!(PayoffHorizon::Never.is_never());
        assert!(!PayoffHorizon::Months(1).is_never());
    }
}
