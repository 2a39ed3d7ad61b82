//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Compass - One clear money directive per day
#[derive(Parser)]
#[command(name = "compass")]
#[command(about = "Self-hosted daily money directive and debt payoff planner", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "compass.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set COMPASS_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show a snapshot of cash, runway and debts
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory of static files to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage money accounts
    Accounts {
        #[command(subcommand)]
        action: Option<AccountsAction>,
    },

    /// Manage recurring income and bills
    Recurring {
        #[command(subcommand)]
        action: Option<RecurringAction>,
    },

    /// Record and list transactions
    Tx {
        #[command(subcommand)]
        action: Option<TxAction>,
    },

    /// Manage debts and payoff plans
    Debts {
        #[command(subcommand)]
        action: Option<DebtsAction>,
    },

    /// Show or acknowledge today's directive
    Decision {
        #[command(subcommand)]
        action: Option<DecisionAction>,
    },

    /// Estimate the APR implied by loan terms
    Apr {
        /// Loan principal in dollars
        #[arg(long)]
        principal: f64,

        /// Monthly payment in dollars
        #[arg(long)]
        payment: f64,

        /// Term in months
        #[arg(long)]
        term: u32,
    },

    /// Monthly payment and total interest for a fixed-rate loan
    Loan {
        /// Loan principal in dollars
        #[arg(long)]
        principal: f64,

        /// APR percent
        #[arg(long)]
        apr: f64,

        /// Term in months
        #[arg(long)]
        term: u32,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List accounts
    List,

    /// Add or update an account
    Add {
        /// Account name
        name: String,

        /// Account type: checking, savings, credit, cash
        #[arg(long, default_value = "checking")]
        kind: String,

        /// Current balance in dollars
        #[arg(long, default_value = "0")]
        balance: f64,
    },

    /// Set an account balance
    SetBalance {
        /// Account ID
        id: i64,

        /// New balance in dollars
        balance: f64,
    },
}

#[derive(Subcommand)]
pub enum RecurringAction {
    /// List recurring items
    List,

    /// Add a recurring item
    Add {
        /// Item name
        name: String,

        /// income or expense
        #[arg(long, default_value = "expense")]
        kind: String,

        /// Amount in dollars
        #[arg(long)]
        amount: f64,

        /// Next due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
    },

    /// Remove a recurring item
    Remove {
        /// Item ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum TxAction {
    /// List recent transactions
    List {
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },

    /// Record a transaction
    Add {
        /// income or expense
        #[arg(long, default_value = "expense")]
        kind: String,

        /// Amount in dollars
        #[arg(long)]
        amount: f64,

        /// What the money was for
        #[arg(long, default_value = "")]
        description: String,

        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DebtsAction {
    /// List debts
    List,

    /// Add a debt
    Add {
        /// Debt name
        name: String,

        /// Balance in dollars
        #[arg(long)]
        balance: f64,

        /// APR percent
        #[arg(long)]
        apr: f64,

        /// Minimum monthly payment in dollars
        #[arg(long)]
        min: Option<f64>,

        /// Next due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Compare avalanche and snowball payoff plans
    Plan {
        /// Extra monthly budget in dollars
        #[arg(long, default_value = "0")]
        extra: f64,

        /// Comma-separated debt IDs to leave out
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Record a payment against a debt
    Pay {
        /// Debt ID
        id: i64,

        /// Payment amount in dollars
        amount: f64,
    },

    /// Update a debt's status
    Status {
        /// Debt ID
        id: i64,

        /// active, paid_off, defaulted, deferred
        status: String,
    },
}

#[derive(Subcommand)]
pub enum DecisionAction {
    /// Show today's directive (computing it if needed)
    Show {
        /// Print the full decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Acknowledge a decision
    Ack {
        /// Decision ID
        id: i64,
    },
}
