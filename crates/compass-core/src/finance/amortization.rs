//! Fixed-rate amortization formulas

use crate::error::{Error, Result};

use super::MAX_PAYOFF_MONTHS;

/// Result of carrying a balance at minimum payments until it hits zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumOnlyPayoff {
    pub months: u32,
    pub total_interest_cents: i64,
}

/// Monthly payment that retires `principal_cents` over `term_months` at the
/// given APR: `M = P*r*(1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate.
/// A zero rate degenerates to straight division.
pub fn monthly_payment(principal_cents: i64, apr_percent: f64, term_months: u32) -> Result<i64> {
    if term_months == 0 {
        return Err(Error::InvalidInput(
            "term must be at least one month".to_string(),
        ));
    }
    if principal_cents < 0 {
        return Err(Error::InvalidInput(
            "principal cannot be negative".to_string(),
        ));
    }

    let principal = principal_cents as f64;
    let n = term_months as f64;
    let r = monthly_rate(apr_percent);

    let payment = if r == 0.0 {
        principal / n
    } else {
        let growth = (1.0 + r).powf(n);
        principal * r * growth / (growth - 1.0)
    };

    Ok(payment.round() as i64)
}

/// Interest paid over the life of a fixed payment schedule
pub fn total_interest(principal_cents: i64, payment_cents: i64, term_months: u32) -> i64 {
    payment_cents * term_months as i64 - principal_cents
}

/// Simulates paying only the minimum every month.
///
/// Each tick the balance accrues one month of interest and sheds one
/// payment. Returns `Ok(None)` when [`MAX_PAYOFF_MONTHS`] ticks pass without
/// the balance reaching zero: the minimum payment never retires the
/// principal. Callers render that as "never", it is not a fault.
pub fn minimum_only_payoff(
    balance_cents: i64,
    apr_percent: f64,
    minimum_payment_cents: i64,
) -> Result<Option<MinimumOnlyPayoff>> {
    if balance_cents < 0 {
        return Err(Error::InvalidInput("balance cannot be negative".to_string()));
    }
    if balance_cents == 0 {
        return Ok(Some(MinimumOnlyPayoff {
            months: 0,
            total_interest_cents: 0,
        }));
    }

    let r = monthly_rate(apr_percent);
    let payment = minimum_payment_cents as f64;
    let mut balance = balance_cents as f64;
    let mut total_interest = 0.0;

    for month in 1..=MAX_PAYOFF_MONTHS {
        let interest = balance * r;
        total_interest += interest;
        balance = balance + interest - payment;
        if balance <= 0.0 {
            return Ok(Some(MinimumOnlyPayoff {
                months: month,
                total_interest_cents: total_interest.round() as i64,
            }));
        }
    }

    Ok(None)
}

pub(crate) fn monthly_rate(apr_percent: f64) -> f64 {
    apr_percent / 100.0 / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_payment_zero_rate() {
        // $120 over 12 months at 0% is a flat $10
        assert_eq!(monthly_payment(12_000, 0.0, 12).unwrap(), 1_000);
    }

    #[test]
    fn test_monthly_payment_standard_loan() {
        // $10,000 at 20% APR over 36 months: the textbook answer is $371.64
        let payment = monthly_payment(1_000_000, 20.0, 36).unwrap();
        assert!((payment - 37_164).abs() <= 1, "payment was {}", payment);
    }

    #[test]
    fn test_monthly_payment_rejects_bad_input() {
        assert!(monthly_payment(1_000, 5.0, 0).is_err());
        assert!(monthly_payment(-1, 5.0, 12).is_err());
    }

    #[test]
    fn test_total_interest() {
        assert_eq!(total_interest(1_000_000, 37_164, 36), 337_904);
        // Payment exactly covering principal carries no interest
        assert_eq!(total_interest(12_000, 1_000, 12), 0);
    }

    #[test]
    fn test_minimum_only_payoff_zero_rate() {
        let payoff = minimum_only_payoff(100_000, 0.0, 10_000).unwrap().unwrap();
        assert_eq!(payoff.months, 10);
        assert_eq!(payoff.total_interest_cents, 0);
    }

    #[test]
    fn test_minimum_only_payoff_accrues_interest() {
        // $2,000 at 24% APR, $100/month: first month accrues $40 interest
        let payoff = minimum_only_payoff(200_000, 24.0, 10_000).unwrap().unwrap();
        assert!(payoff.months > 20, "months was {}", payoff.months);
        assert!(payoff.months <= MAX_PAYOFF_MONTHS);
        assert!(payoff.total_interest_cents > 0);
    }

    #[test]
    fn test_minimum_only_payoff_never_retires() {
        // $10,000 at 24% APR accrues $200/month; a $100 payment loses ground
        let payoff = minimum_only_payoff(1_000_000, 24.0, 10_000).unwrap();
        assert_eq!(payoff, None);
    }

    #[test]
    fn test_minimum_only_payoff_already_paid() {
        let payoff = minimum_only_payoff(0, 24.0, 10_000).unwrap().unwrap();
        assert_eq!(payoff.months, 0);
    }

    #[test]
    fn test_minimum_only_payoff_rejects_negative_balance() {
        assert!(minimum_only_payoff(-100, 5.0, 1_000).is_err());
    }

    #[test]
    fn test_payment_from_formula_retires_loan_at_term() {
        // The closed-form payment pays the loan off at the term, give or
        // take one month of cent rounding in the payment
        let payment = monthly_payment(500_000, 12.0, 24).unwrap();
        let payoff = minimum_only_payoff(500_000, 12.0, payment).unwrap().unwrap();
        assert!(
            (24..=25).contains(&payoff.months),
            "months was {}",
            payoff.months
        );
    }
}
