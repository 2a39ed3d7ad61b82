//! Multi-debt payoff strategy simulation
//!
//! Simulates avalanche and snowball schedules over a set of debts, with
//! freed minimum payments rolling to the head of the order as debts retire.
//! The simulation is a pure function of its inputs: same debts, strategy,
//! extra budget and exclusions always produce the same plan.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::Debt;

use super::amortization::monthly_rate;
use super::{PayoffHorizon, MAX_PAYOFF_MONTHS};

/// APR at which minimizing interest cost outweighs quick-win motivation
pub const HIGH_APR_THRESHOLD: f64 = 25.0;

/// Balances below half a cent are float dust from capped payments
const RETIRED_EPSILON: f64 = 0.005;

/// Payoff ordering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStrategy {
    /// Highest APR first: minimizes total interest
    Avalanche,
    /// Smallest balance first: fastest individual payoffs
    Snowball,
}

impl DebtStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avalanche => "avalanche",
            Self::Snowball => "snowball",
        }
    }
}

impl std::str::FromStr for DebtStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avalanche" => Ok(Self::Avalanche),
            "snowball" => Ok(Self::Snowball),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for DebtStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A debt's position in a payoff plan, with its starting figures
#[derive(Debug, Clone, Serialize)]
pub struct PlannedDebt {
    pub id: i64,
    pub name: String,
    pub balance_cents: i64,
    pub apr_percent: f64,
}

/// Result of simulating one strategy over a debt set
#[derive(Debug, Clone, Serialize)]
pub struct DebtPayoffPlan {
    pub strategy: DebtStrategy,
    pub order: Vec<PlannedDebt>,
    pub total_interest_cents: i64,
    pub months_to_payoff: PayoffHorizon,
}

/// Both strategies side by side, with the recommendation
#[derive(Debug, Clone, Serialize)]
pub struct StrategyComparison {
    pub avalanche: DebtPayoffPlan,
    pub snowball: DebtPayoffPlan,
    pub recommendation: DebtStrategy,
    pub savings_with_avalanche_cents: i64,
}

/// One debt's mutable share of the simulation state
#[derive(Debug, Clone)]
struct SimDebt {
    balance: f64,
    monthly_rate: f64,
    minimum_payment: f64,
}

impl SimDebt {
    fn retired(&self) -> bool {
        self.balance < RETIRED_EPSILON
    }
}

/// Full simulation state between monthly ticks.
///
/// `freed_budget` holds the minimum payments of every retired debt; it is
/// applied to the head of the order starting the month after retirement.
#[derive(Debug, Clone)]
struct SimState {
    debts: Vec<SimDebt>,
    freed_budget: f64,
    interest_accrued: f64,
}

impl SimState {
    fn all_retired(&self) -> bool {
        self.debts.iter().all(SimDebt::retired)
    }
}

/// Advances the simulation by one month, returning the successor state.
///
/// Each live debt accrues one month of interest, then sheds its payment:
/// the head of the order pays `max(own minimum, freed budget)` plus the
/// extra budget, everyone else pays their own minimum, and no payment
/// exceeds the outstanding balance. Minimums freed by retirements recorded
/// here only reach the head on the next tick.
fn advance_month(state: &SimState, extra_payment: f64) -> SimState {
    let mut next = state.clone();

    for debt in next.debts.iter_mut().filter(|d| !d.retired()) {
        let interest = debt.balance * debt.monthly_rate;
        debt.balance += interest;
        next.interest_accrued += interest;
    }

    let head = next.debts.iter().position(|d| !d.retired());
    for (index, debt) in next.debts.iter_mut().enumerate() {
        if debt.retired() {
            continue;
        }
        let mut payment = debt.minimum_payment;
        if Some(index) == head {
            payment = payment.max(state.freed_budget) + extra_payment;
        }
        debt.balance -= payment.min(debt.balance);
    }

    next.freed_budget = next
        .debts
        .iter()
        .filter(|d| d.retired())
        .map(|d| d.minimum_payment)
        .sum();

    next
}

/// Simulates paying off `debts` under `strategy` with an extra monthly
/// budget directed at the head of the order.
///
/// Only active debts with a positive balance participate; `excluded_ids`
/// removes debts (say, a mortgage) from the ordering, the totals and the
/// payoff date entirely. Hitting [`MAX_PAYOFF_MONTHS`] yields
/// [`PayoffHorizon::Never`] with the interest accrued up to the cap.
pub fn simulate(
    debts: &[Debt],
    strategy: DebtStrategy,
    extra_payment_cents: i64,
    excluded_ids: &[i64],
) -> DebtPayoffPlan {
    let ordered = strategy_order(debts, strategy, excluded_ids);

    let order: Vec<PlannedDebt> = ordered
        .iter()
        .map(|d| PlannedDebt {
            id: d.id,
            name: d.name.clone(),
            balance_cents: d.balance_cents,
            apr_percent: d.apr_percent,
        })
        .collect();

    let mut state = SimState {
        debts: ordered
            .iter()
            .map(|d| SimDebt {
                balance: d.balance_cents as f64,
                monthly_rate: monthly_rate(d.apr_percent),
                minimum_payment: d.minimum_payment_cents.unwrap_or(0) as f64,
            })
            .collect(),
        freed_budget: 0.0,
        interest_accrued: 0.0,
    };

    let extra = extra_payment_cents.max(0) as f64;
    let mut months = 0;
    while !state.all_retired() && months < MAX_PAYOFF_MONTHS {
        state = advance_month(&state, extra);
        months += 1;
    }

    let months_to_payoff = if state.all_retired() {
        PayoffHorizon::Months(months)
    } else {
        PayoffHorizon::Never
    };

    DebtPayoffPlan {
        strategy,
        order,
        total_interest_cents: state.interest_accrued.round() as i64,
        months_to_payoff,
    }
}

/// Active, non-excluded, positive-balance debts in strategy order.
/// `Vec::sort_by` is stable, so debts with equal keys keep their input
/// order rather than falling to an arbitrary tiebreak.
fn strategy_order<'a>(
    debts: &'a [Debt],
    strategy: DebtStrategy,
    excluded_ids: &[i64],
) -> Vec<&'a Debt> {
    let excluded: HashSet<i64> = excluded_ids.iter().copied().collect();
    let mut ordered: Vec<&Debt> = debts
        .iter()
        .filter(|d| d.in_simulation() && !excluded.contains(&d.id))
        .collect();

    match strategy {
        DebtStrategy::Avalanche => ordered.sort_by(|a, b| {
            b.apr_percent
                .partial_cmp(&a.apr_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        DebtStrategy::Snowball => ordered.sort_by_key(|d| d.balance_cents),
    }

    ordered
}

/// Picks the strategy worth recommending for this debt set
pub fn recommend(debts: &[Debt]) -> DebtStrategy {
    let has_high_apr = debts
        .iter()
        .any(|d| d.in_simulation() && d.apr_percent >= HIGH_APR_THRESHOLD);
    if has_high_apr {
        DebtStrategy::Avalanche
    } else {
        DebtStrategy::Snowball
    }
}

/// Runs both strategies and reports the interest saved by avalanche
pub fn compare(
    debts: &[Debt],
    extra_payment_cents: i64,
    excluded_ids: &[i64],
) -> StrategyComparison {
    let avalanche = simulate(debts, DebtStrategy::Avalanche, extra_payment_cents, excluded_ids);
    let snowball = simulate(debts, DebtStrategy::Snowball, extra_payment_cents, excluded_ids);
    let savings_with_avalanche_cents =
        (snowball.total_interest_cents - avalanche.total_interest_cents).max(0);

    StrategyComparison {
        avalanche,
        snowball,
        recommendation: recommend(debts),
        savings_with_avalanche_cents,
    }
}
