//! Today's directive commands

use anyhow::Result;
use chrono::Utc;

use compass_core::db::Database;
use compass_core::decision::{acknowledge, current_decision};
use compass_core::models::RiskLevel;

use super::fmt_cents;

/// Identity used for decisions made from the terminal; matches what the
/// server records for unauthenticated local use.
const CLI_USER: &str = "local-dev";

pub fn cmd_decision_show(db: &Database, json: bool) -> Result<()> {
    let outcome = current_decision(db, CLI_USER, Utc::now())?;
    let decision = &outcome.decision;

    if json {
        println!("{}", serde_json::to_string_pretty(decision)?);
        return Ok(());
    }

    let badge = match decision.risk_level {
        RiskLevel::Safe => "🟢 SAFE",
        RiskLevel::Caution => "🟡 CAUTION",
        RiskLevel::Warning => "🟠 WARNING",
        RiskLevel::Danger => "🔴 DANGER",
        RiskLevel::Critical => "🚨 CRITICAL",
    };

    println!("{}  (decision #{})", badge, decision.id);
    println!();
    println!("👉 {}", decision.primary_command.text);
    if let Some(amount) = decision.primary_command.amount_cents {
        println!("   Amount: {}", fmt_cents(amount));
    }
    if let Some(target) = &decision.primary_command.target {
        println!("   Target: {}", target);
    }
    if let Some(date) = decision.primary_command.date {
        println!("   By:     {}", date);
    }

    for warning in &decision.warnings {
        println!("⚠️  {}", warning);
    }

    println!();
    if outcome.is_new {
        println!("   Fresh decision, valid until {} UTC", decision.expires_at);
    } else {
        println!("   Cached decision, valid until {} UTC", decision.expires_at);
    }
    if decision.acknowledged_at.is_none() {
        println!("   Acknowledge with: compass decision ack {}", decision.id);
    }

    Ok(())
}

pub fn cmd_decision_ack(db: &Database, id: i64) -> Result<()> {
    let decision = acknowledge(db, id, Utc::now())?;
    println!(
        "✅ Acknowledged decision #{} ({})",
        decision.id, decision.primary_command.command_type
    );
    Ok(())
}
