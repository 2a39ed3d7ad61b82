//! Decision rule engine
//!
//! Pure evaluation: a [`FinancialSnapshot`] and a date in, one risk-tiered
//! directive out. Thresholds are evaluated in fixed priority order so the
//! first matching tier wins, and every branch is driven by the named
//! constants below rather than inline numbers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::finance::{simulate, DebtStrategy};
use crate::models::{CommandType, Debt, NextAction, PrimaryCommand, RiskLevel, TransactionKind};

use super::{ComputedDecision, FinancialSnapshot};

/// Runway below this many days moves the tier off `safe`
pub const RUNWAY_CAUTION_DAYS: i64 = 14;
/// Runway below this many days is a `warning`
pub const RUNWAY_WARNING_DAYS: i64 = 7;
/// Runway below this many days is `danger`
pub const RUNWAY_DANGER_DAYS: i64 = 3;

/// Reported runway when the burn rate is zero: effectively unlimited
pub const NO_BURN_RUNWAY_DAYS: i64 = 999;

/// Assumed days to payday when no recurring income is scheduled
pub const DEFAULT_DAYS_UNTIL_PAY: i64 = 14;

/// Cash cushion (in days of burn) kept before recommending extra payments
pub const SAFE_BUFFER_DAYS: i64 = 14;

/// Extra debt payments below this are not worth a directive ($50)
pub const EXTRA_PAYMENT_FLOOR_CENTS: i64 = 5_000;

/// A bill due within this many days earns a warning
pub const IMMINENT_BILL_DAYS: i64 = 3;

/// A decision never carries more than this many warnings
pub const MAX_WARNINGS: usize = 2;

/// Month-to-day conversion for "days saved" messaging
const DAYS_PER_MONTH: u32 = 30;

/// Cash-position numbers derived from a snapshot. Also served raw on the
/// dashboard, so everything here is client-consumable.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CashMetrics {
    pub cash_available_cents: i64,
    pub daily_burn_cents: i64,
    pub days_until_pay: i64,
    pub upcoming_bills_cents: i64,
    pub available_after_bills_cents: i64,
    pub runway_days: i64,
}

/// Derives the cash metrics every tier decision hangs off:
/// liquid cash, trailing daily burn, the window to the next payday, the
/// bills due inside that window, and the runway the remainder buys.
pub fn cash_metrics(snapshot: &FinancialSnapshot, today: NaiveDate) -> CashMetrics {
    let cash_available_cents: i64 = snapshot
        .accounts
        .iter()
        .filter(|a| a.account_type.is_liquid())
        .map(|a| a.balance_cents)
        .sum();

    let daily_burn_cents = (snapshot.expenses_30d_cents as f64 / 30.0).round() as i64;

    let days_until_pay = snapshot
        .recurring
        .iter()
        .filter(|r| r.kind == TransactionKind::Income)
        .map(|r| (r.next_due_date - today).num_days().max(0))
        .min()
        .unwrap_or(DEFAULT_DAYS_UNTIL_PAY);

    let next_payday = today + chrono::Duration::days(days_until_pay);
    let upcoming_bills_cents: i64 = snapshot
        .recurring
        .iter()
        .filter(|r| r.kind == TransactionKind::Expense && r.next_due_date <= next_payday)
        .map(|r| r.amount_cents)
        .sum();

    let available_after_bills_cents = cash_available_cents - upcoming_bills_cents;

    let runway_days = if daily_burn_cents == 0 {
        NO_BURN_RUNWAY_DAYS
    } else {
        available_after_bills_cents.max(0) / daily_burn_cents
    };

    CashMetrics {
        cash_available_cents,
        daily_burn_cents,
        days_until_pay,
        upcoming_bills_cents,
        available_after_bills_cents,
        runway_days,
    }
}

/// Evaluates the snapshot into today's single directive
pub fn evaluate(snapshot: &FinancialSnapshot, today: NaiveDate) -> ComputedDecision {
    let metrics = cash_metrics(snapshot, today);
    let risk_level = tier(&metrics);

    let active_debts: Vec<&Debt> = snapshot.debts.iter().filter(|d| d.in_simulation()).collect();
    let minimums_cents: i64 = active_debts
        .iter()
        .map(|d| d.minimum_payment_cents.unwrap_or(0))
        .sum();

    let first_bill = snapshot
        .recurring
        .iter()
        .filter(|r| {
            r.kind == TransactionKind::Expense
                && r.next_due_date <= today + chrono::Duration::days(metrics.days_until_pay)
        })
        .min_by_key(|r| r.next_due_date);

    let mut warnings: Vec<String> = Vec::new();
    let primary_command;
    let next_action;

    match risk_level {
        RiskLevel::Critical => {
            let deficit = -metrics.available_after_bills_cents;
            primary_command = PrimaryCommand {
                command_type: CommandType::Freeze,
                text: format!(
                    "Bills due before payday exceed your cash by {}. Freeze all non-essential spending.",
                    fmt_money(deficit)
                ),
                amount_cents: Some(deficit),
                target: None,
                date: None,
            };
            next_action = NextAction {
                text: "Review your upcoming bills".to_string(),
                url: "/bills".to_string(),
            };
            if let Some(bill) = first_bill {
                warnings.push(format!(
                    "{} ({}) is due before your next payday and may not clear",
                    bill.name,
                    fmt_money(bill.amount_cents)
                ));
            }
            warnings.push("You are short until payday".to_string());
        }
        RiskLevel::Danger | RiskLevel::Warning => {
            let days = metrics.days_until_pay.max(1);
            let daily_cap = metrics.available_after_bills_cents / days;
            primary_command = PrimaryCommand {
                command_type: CommandType::Freeze,
                text: format!(
                    "Money is tight until payday. Hold spending to {} a day.",
                    fmt_money(daily_cap)
                ),
                amount_cents: Some(daily_cap),
                target: None,
                date: None,
            };
            next_action = NextAction {
                text: "Review your upcoming bills".to_string(),
                url: "/bills".to_string(),
            };
            push_imminent_bill_warning(&mut warnings, first_bill, today);
            warnings.push(format!(
                "Only {} days of cash runway left",
                metrics.runway_days
            ));
        }
        RiskLevel::Caution | RiskLevel::Safe if !active_debts.is_empty() => {
            let safe_buffer = metrics.daily_burn_cents * SAFE_BUFFER_DAYS;
            let extra =
                (metrics.available_after_bills_cents - safe_buffer - minimums_cents).max(0);

            if extra > EXTRA_PAYMENT_FLOOR_CENTS {
                primary_command = extra_payment_command(&snapshot.debts, &active_debts, extra);
                next_action = NextAction {
                    text: "See your payoff plan".to_string(),
                    url: "/debts".to_string(),
                };
            } else if let Some(due) = active_debts
                .iter()
                .filter(|d| d.next_due_date.is_some())
                .min_by_key(|d| d.next_due_date)
            {
                primary_command = minimum_payment_command(due);
                next_action = NextAction {
                    text: "See your payoff plan".to_string(),
                    url: "/debts".to_string(),
                };
            } else {
                primary_command = weekly_spend_command(&metrics);
                next_action = NextAction {
                    text: "See today's numbers".to_string(),
                    url: "/dashboard".to_string(),
                };
            }

            push_imminent_bill_warning(&mut warnings, first_bill, today);
            if risk_level == RiskLevel::Caution {
                warnings.push(format!(
                    "Runway is down to {} days",
                    metrics.runway_days
                ));
            }
        }
        RiskLevel::Caution | RiskLevel::Safe => {
            primary_command = weekly_spend_command(&metrics);
            next_action = NextAction {
                text: "See today's numbers".to_string(),
                url: "/dashboard".to_string(),
            };
            push_imminent_bill_warning(&mut warnings, first_bill, today);
            if risk_level == RiskLevel::Caution {
                warnings.push(format!(
                    "Runway is down to {} days",
                    metrics.runway_days
                ));
            }
        }
    }

    warnings.truncate(MAX_WARNINGS);

    let debt_balance_cents: i64 = active_debts.iter().map(|d| d.balance_cents).sum();
    let basis = serde_json::json!({
        "metrics": metrics,
        "active_debt_count": active_debts.len(),
        "debt_balance_cents": debt_balance_cents,
        "minimum_payments_cents": minimums_cents,
    });

    ComputedDecision {
        risk_level,
        primary_command,
        warnings,
        next_action,
        basis,
    }
}

/// First matching tier wins: a post-bill deficit is critical no matter how
/// long the runway looks, then the runway thresholds take over.
fn tier(metrics: &CashMetrics) -> RiskLevel {
    if metrics.available_after_bills_cents < 0 {
        return RiskLevel::Critical;
    }
    if metrics.runway_days < RUNWAY_DANGER_DAYS {
        RiskLevel::Danger
    } else if metrics.runway_days < RUNWAY_WARNING_DAYS {
        RiskLevel::Warning
    } else if metrics.runway_days < RUNWAY_CAUTION_DAYS {
        RiskLevel::Caution
    } else {
        RiskLevel::Safe
    }
}

/// Directs the spare cash at the highest-APR debt, quoting how many days
/// sooner the payoff lands. Both payoff dates come from the canonical
/// per-debt simulator so the message can never disagree with the debt
/// dashboard.
fn extra_payment_command(
    all_debts: &[Debt],
    active_debts: &[&Debt],
    extra_cents: i64,
) -> PrimaryCommand {
    let target = active_debts
        .iter()
        .copied()
        .reduce(|best, d| if d.apr_percent > best.apr_percent { d } else { best })
        .expect("caller checked active_debts is non-empty");

    let base = simulate(all_debts, DebtStrategy::Avalanche, 0, &[]);
    let boosted = simulate(all_debts, DebtStrategy::Avalanche, extra_cents, &[]);

    let days_saved = match (
        base.months_to_payoff.months(),
        boosted.months_to_payoff.months(),
    ) {
        (Some(base_months), Some(boosted_months)) if base_months > boosted_months => {
            Some((base_months - boosted_months) * DAYS_PER_MONTH)
        }
        _ => None,
    };

    let text = match days_saved {
        Some(days) => format!(
            "Put {} extra toward {} today. That brings your debt-free date {} days closer.",
            fmt_money(extra_cents),
            target.name,
            days
        ),
        None => format!(
            "Put {} extra toward {} today and knock down your highest rate.",
            fmt_money(extra_cents),
            target.name
        ),
    };

    PrimaryCommand {
        command_type: CommandType::Pay,
        text,
        amount_cents: Some(extra_cents),
        target: Some(target.name.clone()),
        date: None,
    }
}

fn minimum_payment_command(debt: &Debt) -> PrimaryCommand {
    let text = match (debt.minimum_payment_cents, debt.next_due_date) {
        (Some(min), Some(due)) => format!(
            "Pay the {} minimum of {} by {}.",
            debt.name,
            fmt_money(min),
            due
        ),
        (_, Some(due)) => format!("Make a payment on {} by {}.", debt.name, due),
        _ => format!("Make a payment on {}.", debt.name),
    };

    PrimaryCommand {
        command_type: CommandType::Pay,
        text,
        amount_cents: debt.minimum_payment_cents,
        target: Some(debt.name.clone()),
        date: debt.next_due_date,
    }
}

fn weekly_spend_command(metrics: &CashMetrics) -> PrimaryCommand {
    let days = metrics.days_until_pay.max(1);
    let weekly_cap = metrics.available_after_bills_cents * 7 / days;
    PrimaryCommand {
        command_type: CommandType::Spend,
        text: format!(
            "You're clear to spend up to {} this week.",
            fmt_money(weekly_cap)
        ),
        amount_cents: Some(weekly_cap),
        target: None,
        date: None,
    }
}

fn push_imminent_bill_warning(
    warnings: &mut Vec<String>,
    first_bill: Option<&crate::models::RecurringItem>,
    today: NaiveDate,
) {
    if let Some(bill) = first_bill {
        let days_away = (bill.next_due_date - today).num_days();
        if (0..=IMMINENT_BILL_DAYS).contains(&days_away) {
            let when = if days_away == 0 {
                "today".to_string()
            } else if days_away == 1 {
                "tomorrow".to_string()
            } else {
                format!("in {} days", days_away)
            };
            warnings.push(format!(
                "{} ({}) is due {}",
                bill.name,
                fmt_money(bill.amount_cents),
                when
            ));
        }
    }
}

fn fmt_money(cents: i64) -> String {
    if cents < 0 {
        format!("-${:.2}", (-cents) as f64 / 100.0)
    } else {
        format!("${:.2}", cents as f64 / 100.0)
    }
}
