//! APR recovery from loan terms
//!
//! Lenders quote a payment and a term more readily than a rate. This module
//! recovers the implied APR by bisecting on the monthly rate, using the fact
//! that the amortization payment is strictly increasing in the rate.

/// Bisection iteration budget. The search interval is [0, 1] and halves
/// every step, so 100 iterations narrow it far beyond what
/// [`PAYMENT_TOLERANCE`] needs; the loop always terminates well inside this.
pub const MAX_BISECTION_ITERATIONS: u32 = 100;

/// Early-exit tolerance on the payment match, in cents.
pub const PAYMENT_TOLERANCE: f64 = 1e-5;

/// Upper bound of the search: 100% interest per month, a deliberately
/// generous ceiling no consumer debt approaches.
const MAX_MONTHLY_RATE: f64 = 1.0;

/// Recovers the APR implied by `(principal, payment, term)`.
///
/// Returns `None` when no non-negative rate fits: non-positive inputs, or a
/// payment schedule whose total falls short of the principal. A schedule
/// whose total exactly equals the principal is a zero-interest loan.
/// The result is rounded to two decimals.
pub fn estimate_apr(
    principal_cents: i64,
    monthly_payment_cents: i64,
    term_months: u32,
) -> Option<f64> {
    if principal_cents <= 0 || monthly_payment_cents <= 0 || term_months == 0 {
        return None;
    }

    let principal = principal_cents as f64;
    let payment = monthly_payment_cents as f64;
    let total_paid = payment * term_months as f64;

    if total_paid <= principal {
        if total_paid == principal {
            return Some(0.0);
        }
        return None;
    }

    let mut low = 0.0_f64;
    let mut high = MAX_MONTHLY_RATE;
    let mut rate = 0.0_f64;

    for _ in 0..MAX_BISECTION_ITERATIONS {
        rate = (low + high) / 2.0;
        let calculated = payment_at_rate(principal, rate, term_months);

        if (calculated - payment).abs() < PAYMENT_TOLERANCE {
            break;
        }
        if calculated < payment {
            low = rate;
        } else {
            high = rate;
        }
    }

    Some(round_to_cents_precision(rate * 12.0 * 100.0))
}

/// Amortization payment for a raw monthly rate, unrounded
fn payment_at_rate(principal: f64, monthly_rate: f64, term_months: u32) -> f64 {
    let n = term_months as f64;
    if monthly_rate == 0.0 {
        return principal / n;
    }
    let growth = (1.0 + monthly_rate).powf(n);
    principal * monthly_rate * growth / (growth - 1.0)
}

fn round_to_cents_precision(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::amortization::monthly_payment;

    #[test]
    fn test_round_trip_recovers_known_apr() {
        // $10,000 at 20% over 36 months, via the forward formula and back
        let payment = monthly_payment(1_000_000, 20.0, 36).unwrap();
        let apr = estimate_apr(1_000_000, payment, 36).unwrap();
        assert!((apr - 20.0).abs() <= 0.01, "apr was {}", apr);
    }

    #[test]
    fn test_zero_interest_loan() {
        // Payments summing exactly to the principal imply a 0% rate
        assert_eq!(estimate_apr(120_000, 10_000, 12), Some(0.0));
    }

    #[test]
    fn test_underwater_schedule_is_unresolvable() {
        // Payments sum to less than the principal; no non-negative rate fits
        assert_eq!(estimate_apr(120_000, 9_000, 12), None);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(estimate_apr(0, 1_000, 12), None);
        assert_eq!(estimate_apr(-5, 1_000, 12), None);
        assert_eq!(estimate_apr(1_000, 0, 12), None);
        assert_eq!(estimate_apr(1_000, 100, 0), None);
    }

    #[test]
    fn test_low_rate_edge_resolves() {
        // Total barely exceeds principal; the rate is tiny but real
        let apr = estimate_apr(1_000, 10, 200).unwrap();
        assert!(apr.is_finite());
        assert!(apr >= 0.0);
        assert!(apr < 100.0, "apr was {}", apr);
    }

    #[test]
    fn test_high_rate_recovery() {
        let payment = monthly_payment(50_000, 99.0, 24).unwrap();
        let apr = estimate_apr(50_000, payment, 24).unwrap();
        assert!((apr - 99.0).abs() <= 0.05, "apr was {}", apr);
    }
}
