//! CLI command tests against an in-memory database

use compass_core::db::Database;
use compass_core::models::{AccountType, DebtStatus, TransactionKind};

use crate::commands;

#[test]
fn test_money_parsing_helpers() {
    assert_eq!(commands::dollars_to_cents(12.34), 1_234);
    assert_eq!(commands::dollars_to_cents(0.0), 0);
    // Float dust rounds to the nearest cent
    assert_eq!(commands::dollars_to_cents(19.99), 1_999);

    assert_eq!(commands::fmt_cents(1_234), "$12.34");
    assert_eq!(commands::fmt_cents(-5_000), "-$50.00");

    assert!(commands::parse_date_arg("2026-03-10").is_ok());
    assert!(commands::parse_date_arg("03/10/2026").is_err());
}

#[test]
fn test_accounts_commands_round_trip() {
    let db = Database::in_memory().unwrap();

    commands::cmd_accounts_add(&db, "Checking", "checking", 1_500.0).unwrap();
    let accounts = db.list_accounts().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].account_type, AccountType::Checking);
    assert_eq!(accounts[0].balance_cents, 150_000);

    commands::cmd_accounts_set_balance(&db, accounts[0].id, 1_000.0).unwrap();
    assert_eq!(db.list_accounts().unwrap()[0].balance_cents, 100_000);

    // Unknown account type is a parse error, not a panic
    assert!(commands::cmd_accounts_add(&db, "Weird", "offshore", 1.0).is_err());
}

#[test]
fn test_recurring_and_tx_commands() {
    let db = Database::in_memory().unwrap();

    commands::cmd_recurring_add(&db, "Rent", "expense", 1_200.0, "2026-04-01").unwrap();
    let items = db.list_recurring().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, TransactionKind::Expense);
    assert_eq!(items[0].amount_cents, 120_000);

    commands::cmd_tx_add(&db, "expense", 42.50, "groceries", Some("2026-03-10")).unwrap();
    let txs = db.list_transactions(10).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount_cents, 4_250);

    assert!(commands::cmd_recurring_add(&db, "Bad", "sideways", 1.0, "2026-04-01").is_err());
    assert!(commands::cmd_tx_add(&db, "expense", 1.0, "x", Some("soon")).is_err());
}

#[test]
fn test_debts_commands() {
    let db = Database::in_memory().unwrap();

    commands::cmd_debts_add(&db, "Visa", 2_000.0, 24.0, Some(60.0), None).unwrap();
    commands::cmd_debts_add(&db, "Store card", 500.0, 15.0, Some(25.0), None).unwrap();

    let debts = db.list_debts().unwrap();
    assert_eq!(debts.len(), 2);
    commands::cmd_debts_list(&db).unwrap();

    // Plan prints without blowing up for any mix of debts
    commands::cmd_debts_plan(&db, 100.0, None).unwrap();
    let first_id = debts[0].id.to_string();
    commands::cmd_debts_plan(&db, 0.0, Some(first_id.as_str())).unwrap();
    assert!(commands::cmd_debts_plan(&db, 0.0, Some("banana")).is_err());

    let visa = debts.iter().find(|d| d.name == "Visa").unwrap();
    commands::cmd_debts_pay(&db, visa.id, 2_500.0).unwrap();
    assert_eq!(
        db.get_debt(visa.id).unwrap().unwrap().status,
        DebtStatus::PaidOff
    );

    commands::cmd_debts_status(&db, visa.id, "deferred").unwrap();
    assert_eq!(
        db.get_debt(visa.id).unwrap().unwrap().status,
        DebtStatus::Deferred
    );
    assert!(commands::cmd_debts_status(&db, visa.id, "vaporized").is_err());
}

#[test]
fn test_loan_and_apr_commands() {
    commands::cmd_loan(10_000.0, 20.0, 36).unwrap();
    // A zero-month term is invalid input, not a panic
    assert!(commands::cmd_loan(10_000.0, 20.0, 0).is_err());

    // Both the resolvable and unresolvable paths print an answer
    commands::cmd_apr(10_000.0, 371.64, 36).unwrap();
    commands::cmd_apr(1_200.0, 90.0, 12).unwrap();
}

#[test]
fn test_decision_commands() {
    let db = Database::in_memory().unwrap();
    commands::cmd_accounts_add(&db, "Checking", "checking", 5_000.0).unwrap();

    commands::cmd_decision_show(&db, false).unwrap();
    let decisions = db.list_decisions("local-dev", 10).unwrap();
    assert_eq!(decisions.len(), 1);

    // JSON output reuses the cached decision instead of computing again
    commands::cmd_decision_show(&db, true).unwrap();
    assert_eq!(db.list_decisions("local-dev", 10).unwrap().len(), 1);

    commands::cmd_decision_ack(&db, decisions[0].id).unwrap();
    assert!(db
        .get_decision(decisions[0].id)
        .unwrap()
        .unwrap()
        .acknowledged_at
        .is_some());
}
