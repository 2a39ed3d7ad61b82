//! Account, recurring item and transaction commands

use anyhow::{bail, Result};
use chrono::Utc;

use compass_core::db::Database;
use compass_core::models::{
    AccountType, NewRecurringItem, NewTransaction, TransactionKind,
};

use super::{dollars_to_cents, fmt_cents, parse_date_arg};

pub fn cmd_accounts_list(db: &Database) -> Result<()> {
    let accounts = db.list_accounts()?;
    if accounts.is_empty() {
        println!("No accounts yet. Add one with: compass accounts add Checking --balance 1500");
        return Ok(());
    }

    println!("🏦 Accounts");
    for account in &accounts {
        println!(
            "   [{}] {:<20} {:<9} {}",
            account.id,
            account.name,
            account.account_type,
            fmt_cents(account.balance_cents)
        );
    }

    let liquid: i64 = accounts
        .iter()
        .filter(|a| a.account_type.is_liquid())
        .map(|a| a.balance_cents)
        .sum();
    println!("   ─────────────────────────────");
    println!("   Spendable cash: {}", fmt_cents(liquid));

    Ok(())
}

pub fn cmd_accounts_add(db: &Database, name: &str, kind: &str, balance: f64) -> Result<()> {
    let account_type: AccountType = match kind.parse() {
        Ok(t) => t,
        Err(e) => bail!(e),
    };

    let id = db.upsert_account(name, account_type, dollars_to_cents(balance))?;
    println!("✅ Account [{}] {} ({})", id, name, account_type);
    Ok(())
}

pub fn cmd_accounts_set_balance(db: &Database, id: i64, balance: f64) -> Result<()> {
    db.set_account_balance(id, dollars_to_cents(balance))?;
    println!("✅ Balance updated");
    Ok(())
}

pub fn cmd_recurring_list(db: &Database) -> Result<()> {
    let items = db.list_recurring()?;
    if items.is_empty() {
        println!("No recurring items yet.");
        return Ok(());
    }

    println!("🔁 Recurring");
    for item in &items {
        let arrow = match item.kind {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
        };
        println!(
            "   [{}] {:<20} {}{:<12} due {}",
            item.id,
            item.name,
            arrow,
            fmt_cents(item.amount_cents),
            item.next_due_date
        );
    }

    Ok(())
}

pub fn cmd_recurring_add(
    db: &Database,
    name: &str,
    kind: &str,
    amount: f64,
    due: &str,
) -> Result<()> {
    let kind: TransactionKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => bail!(e),
    };
    let next_due_date = parse_date_arg(due)?;

    let id = db.insert_recurring(&NewRecurringItem {
        name: name.to_string(),
        kind,
        amount_cents: dollars_to_cents(amount),
        next_due_date,
    })?;
    println!("✅ Recurring item [{}] {}", id, name);
    Ok(())
}

pub fn cmd_recurring_remove(db: &Database, id: i64) -> Result<()> {
    db.delete_recurring(id)?;
    println!("✅ Removed");
    Ok(())
}

pub fn cmd_tx_list(db: &Database, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(limit)?;
    if transactions.is_empty() {
        println!("No transactions yet.");
        return Ok(());
    }

    println!("🧾 Transactions");
    for tx in &transactions {
        let arrow = match tx.kind {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
        };
        println!(
            "   {} {}{:<12} {}",
            tx.date,
            arrow,
            fmt_cents(tx.amount_cents),
            tx.description
        );
    }

    Ok(())
}

pub fn cmd_tx_add(
    db: &Database,
    kind: &str,
    amount: f64,
    description: &str,
    date: Option<&str>,
) -> Result<()> {
    let kind: TransactionKind = match kind.parse() {
        Ok(k) => k,
        Err(e) => bail!(e),
    };
    let date = match date {
        Some(raw) => parse_date_arg(raw)?,
        None => Utc::now().date_naive(),
    };

    let id = db.insert_transaction(&NewTransaction {
        account_id: None,
        kind,
        amount_cents: dollars_to_cents(amount),
        description: description.to_string(),
        date,
    })?;
    println!("✅ Recorded transaction [{}]", id);
    Ok(())
}
