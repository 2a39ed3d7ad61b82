//! Debt management and payoff plan commands

use anyhow::{bail, Result};
use chrono::Utc;

use compass_core::db::Database;
use compass_core::finance::{compare, minimum_only_payoff, DebtPayoffPlan, PayoffHorizon};
use compass_core::models::{DebtStatus, NewDebt};

use super::{dollars_to_cents, fmt_cents, parse_date_arg};

pub fn cmd_debts_list(db: &Database) -> Result<()> {
    let debts = db.list_debts()?;
    if debts.is_empty() {
        println!("No debts tracked. If that's true in real life too: 🎉");
        return Ok(());
    }

    println!("💳 Debts");
    for debt in &debts {
        let min = debt
            .minimum_payment_cents
            .map(|m| format!("min {}", fmt_cents(m)))
            .unwrap_or_else(|| "no minimum".to_string());
        println!(
            "   [{}] {:<20} {:<12} {:>6.2}%  {}  ({})",
            debt.id,
            debt.name,
            fmt_cents(debt.balance_cents),
            debt.apr_percent,
            min,
            debt.status
        );

        // What paying only the minimum would cost
        if let (true, Some(minimum)) = (debt.in_simulation(), debt.minimum_payment_cents) {
            match minimum_only_payoff(debt.balance_cents, debt.apr_percent, minimum)? {
                Some(payoff) => println!(
                    "        minimum-only: {} months, {} interest",
                    payoff.months,
                    fmt_cents(payoff.total_interest_cents)
                ),
                None => println!("        minimum-only: never pays off ⚠️"),
            }
        }
    }

    Ok(())
}

pub fn cmd_debts_add(
    db: &Database,
    name: &str,
    balance: f64,
    apr: f64,
    min: Option<f64>,
    due: Option<&str>,
) -> Result<()> {
    let next_due_date = due.map(parse_date_arg).transpose()?;

    let id = db.insert_debt(&NewDebt {
        name: name.to_string(),
        balance_cents: dollars_to_cents(balance),
        apr_percent: apr,
        minimum_payment_cents: min.map(dollars_to_cents),
        next_due_date,
    })?;
    println!("✅ Debt [{}] {} at {:.2}% APR", id, name, apr);
    Ok(())
}

pub fn cmd_debts_plan(db: &Database, extra: f64, exclude: Option<&str>) -> Result<()> {
    let excluded_ids = parse_excluded(exclude)?;
    let debts = db.list_debts()?;
    let comparison = compare(&debts, dollars_to_cents(extra), &excluded_ids);

    if comparison.avalanche.order.is_empty() {
        println!("Nothing to simulate: no active debts with a balance.");
        return Ok(());
    }

    println!("🏔️  Avalanche (highest APR first)");
    print_plan(&comparison.avalanche);
    println!();
    println!("⛄ Snowball (smallest balance first)");
    print_plan(&comparison.snowball);
    println!();
    println!("   Recommendation: {}", comparison.recommendation);
    if comparison.savings_with_avalanche_cents > 0 {
        println!(
            "   Avalanche saves {} in interest",
            fmt_cents(comparison.savings_with_avalanche_cents)
        );
    }

    Ok(())
}

fn print_plan(plan: &DebtPayoffPlan) {
    for (position, debt) in plan.order.iter().enumerate() {
        println!(
            "   {}. {} ({}, {:.2}%)",
            position + 1,
            debt.name,
            fmt_cents(debt.balance_cents),
            debt.apr_percent
        );
    }
    match plan.months_to_payoff {
        PayoffHorizon::Months(months) => {
            println!(
                "   Debt-free in {} months, {} interest",
                months,
                fmt_cents(plan.total_interest_cents)
            );
        }
        PayoffHorizon::Never => {
            println!("   ⚠️  These payments never retire the balance");
        }
    }
}

pub fn cmd_debts_pay(db: &Database, id: i64, amount: f64) -> Result<()> {
    let debt = db.apply_debt_payment(id, dollars_to_cents(amount), Utc::now().date_naive())?;
    if debt.status == DebtStatus::PaidOff {
        println!("🎉 {} is paid off!", debt.name);
    } else {
        println!(
            "✅ Payment recorded. {} now at {}",
            debt.name,
            fmt_cents(debt.balance_cents)
        );
    }
    Ok(())
}

pub fn cmd_debts_status(db: &Database, id: i64, status: &str) -> Result<()> {
    let status: DebtStatus = match status.parse() {
        Ok(s) => s,
        Err(e) => bail!(e),
    };
    db.update_debt_status(id, status)?;
    println!("✅ Status set to {}", status);
    Ok(())
}

fn parse_excluded(raw: Option<&str>) -> Result<Vec<i64>> {
    let Some(raw) = raw else {
        return Ok(vec![]);
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<i64>() {
            Ok(id) => Ok(id),
            Err(_) => bail!("--exclude takes comma-separated debt IDs, got '{}'", s),
        })
        .collect()
}
