//! Compass CLI - Daily money directive and debt payoff planner
//!
//! Usage:
//!   compass init                  Initialize database
//!   compass status                Cash, runway and debt snapshot
//!   compass decision show         Today's directive
//!   compass debts plan            Avalanche vs snowball comparison
//!   compass serve --port 3000     Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Accounts { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action.unwrap_or(AccountsAction::List) {
                AccountsAction::List => commands::cmd_accounts_list(&db),
                AccountsAction::Add {
                    name,
                    kind,
                    balance,
                } => commands::cmd_accounts_add(&db, &name, &kind, balance),
                AccountsAction::SetBalance { id, balance } => {
                    commands::cmd_accounts_set_balance(&db, id, balance)
                }
            }
        }
        Commands::Recurring { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action.unwrap_or(RecurringAction::List) {
                RecurringAction::List => commands::cmd_recurring_list(&db),
                RecurringAction::Add {
                    name,
                    kind,
                    amount,
                    due,
                } => commands::cmd_recurring_add(&db, &name, &kind, amount, &due),
                RecurringAction::Remove { id } => commands::cmd_recurring_remove(&db, id),
            }
        }
        Commands::Tx { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action.unwrap_or(TxAction::List { limit: 20 }) {
                TxAction::List { limit } => commands::cmd_tx_list(&db, limit),
                TxAction::Add {
                    kind,
                    amount,
                    description,
                    date,
                } => commands::cmd_tx_add(&db, &kind, amount, &description, date.as_deref()),
            }
        }
        Commands::Debts { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action.unwrap_or(DebtsAction::List) {
                DebtsAction::List => commands::cmd_debts_list(&db),
                DebtsAction::Add {
                    name,
                    balance,
                    apr,
                    min,
                    due,
                } => commands::cmd_debts_add(&db, &name, balance, apr, min, due.as_deref()),
                DebtsAction::Plan { extra, exclude } => {
                    commands::cmd_debts_plan(&db, extra, exclude.as_deref())
                }
                DebtsAction::Pay { id, amount } => commands::cmd_debts_pay(&db, id, amount),
                DebtsAction::Status { id, status } => {
                    commands::cmd_debts_status(&db, id, &status)
                }
            }
        }
        Commands::Decision { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action.unwrap_or(DecisionAction::Show { json: false }) {
                DecisionAction::Show { json } => commands::cmd_decision_show(&db, json),
                DecisionAction::Ack { id } => commands::cmd_decision_ack(&db, id),
            }
        }
        Commands::Apr {
            principal,
            payment,
            term,
        } => commands::cmd_apr(principal, payment, term),
        Commands::Loan {
            principal,
            apr,
            term,
        } => commands::cmd_loan(principal, apr, term),
    }
}
