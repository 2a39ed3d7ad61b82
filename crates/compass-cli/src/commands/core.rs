//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Snapshot of cash, runway and debts
//! - `cmd_serve` - Start the web server
//! - `cmd_loan` - Fixed-rate payment/interest math
//! - `cmd_apr` - APR estimation from loan terms

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use compass_core::db::Database;
use compass_core::decision::{cash_metrics, FinancialSnapshot};
use compass_core::finance::{estimate_apr, monthly_payment, total_interest};
use compass_server::ServerConfig;

use super::{dollars_to_cents, fmt_cents};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path.to_string_lossy();
    if no_encrypt {
        Database::new_unencrypted(&path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(&path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let _db = open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add an account:   compass accounts add Checking --balance 1500");
    println!("  2. Add your bills:   compass recurring add Rent --amount 1200 --due 2026-09-01");
    println!("  3. Get a directive:  compass decision show");

    Ok(())
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    let today = Utc::now().date_naive();
    let snapshot = FinancialSnapshot::load(&db, today)?;
    let metrics = cash_metrics(&snapshot, today);

    println!("📊 Compass Status");
    println!("   ─────────────────────────────");
    println!("   Cash available:    {}", fmt_cents(metrics.cash_available_cents));
    println!("   Daily burn:        {}", fmt_cents(metrics.daily_burn_cents));
    println!(
        "   Bills before pay:  {}",
        fmt_cents(metrics.upcoming_bills_cents)
    );
    println!(
        "   After bills:       {}",
        fmt_cents(metrics.available_after_bills_cents)
    );
    println!("   Runway:            {} days", metrics.runway_days);
    println!("   Days until pay:    {}", metrics.days_until_pay);

    let active: Vec<_> = snapshot.debts.iter().filter(|d| d.in_simulation()).collect();
    if active.is_empty() {
        println!("   Debts:             none 🎉");
    } else {
        let total: i64 = active.iter().map(|d| d.balance_cents).sum();
        println!(
            "   Debts:             {} active, {} total",
            active.len(),
            fmt_cents(total)
        );
    }

    Ok(())
}

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Compass web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Parse API keys from environment (comma-separated)
    let api_keys: Vec<String> = std::env::var("COMPASS_API_KEYS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if no_auth {
        println!("   ⚠️  Authentication: DISABLED (--no-auth)");
    } else if api_keys.is_empty() {
        println!("   🔐 Authentication: proxy identity header");
    } else {
        println!(
            "   🔐 Authentication: proxy identity header + {} API key(s)",
            api_keys.len()
        );
    }

    // Parse allowed CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("COMPASS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;
    let config = ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
    };

    let static_dir_str = static_dir.map(|p| p.to_string_lossy().into_owned());
    compass_server::serve_with_config(db, host, port, static_dir_str.as_deref(), config).await?;

    Ok(())
}

pub fn cmd_loan(principal: f64, apr: f64, term: u32) -> Result<()> {
    let principal_cents = dollars_to_cents(principal);
    let payment_cents = monthly_payment(principal_cents, apr, term)?;
    let interest_cents = total_interest(principal_cents, payment_cents, term);

    println!(
        "💡 {} at {:.2}% APR over {} months:",
        fmt_cents(principal_cents),
        apr,
        term
    );
    println!("   Monthly payment: {}", fmt_cents(payment_cents));
    println!("   Total interest:  {}", fmt_cents(interest_cents));

    Ok(())
}

pub fn cmd_apr(principal: f64, payment: f64, term: u32) -> Result<()> {
    let principal_cents = dollars_to_cents(principal);
    let payment_cents = dollars_to_cents(payment);

    match estimate_apr(principal_cents, payment_cents, term) {
        Some(apr) => {
            println!(
                "💡 {} paid at {}/month over {} months implies an APR of {:.2}%",
                fmt_cents(principal_cents),
                fmt_cents(payment_cents),
                term,
                apr
            );
        }
        None => {
            println!("❌ Cannot resolve an APR from those terms.");
            println!("   Either an input is non-positive, or the payments never retire the principal.");
        }
    }

    Ok(())
}
