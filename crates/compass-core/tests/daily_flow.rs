//! End-to-end daily flow: seed a household, pull the day's directive,
//! compare payoff strategies, make a payment, and roll to the next day.

use chrono::{NaiveDate, TimeZone, Utc};

use compass_core::models::{
    AccountType, CommandType, NewDebt, NewRecurringItem, NewTransaction, RiskLevel,
    TransactionKind,
};
use compass_core::{compare, current_decision, Database, DebtStrategy};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seed(db: &Database) {
    db.upsert_account("Checking", AccountType::Checking, 420_000)
        .unwrap();
    db.upsert_account("Savings", AccountType::Savings, 250_000)
        .unwrap();

    // A month of groceries and gas: $90/day of burn
    for day in 1..=30 {
        db.insert_transaction(&NewTransaction {
            account_id: None,
            kind: TransactionKind::Expense,
            amount_cents: 9_000,
            description: "daily spend".to_string(),
            date: date(2026, 3, 1) + chrono::Duration::days(day - 1),
        })
        .unwrap();
    }

    db.insert_recurring(&NewRecurringItem {
        name: "Payday".to_string(),
        kind: TransactionKind::Income,
        amount_cents: 500_000,
        next_due_date: date(2026, 4, 10),
    })
    .unwrap();
    db.insert_recurring(&NewRecurringItem {
        name: "Rent".to_string(),
        kind: TransactionKind::Expense,
        amount_cents: 150_000,
        next_due_date: date(2026, 4, 5),
    })
    .unwrap();

    db.insert_debt(&NewDebt {
        name: "Visa".to_string(),
        balance_cents: 300_000,
        apr_percent: 26.0,
        minimum_payment_cents: Some(9_000),
        next_due_date: Some(date(2026, 4, 8)),
    })
    .unwrap();
    db.insert_debt(&NewDebt {
        name: "Store card".to_string(),
        balance_cents: 80_000,
        apr_percent: 18.0,
        minimum_payment_cents: Some(3_000),
        next_due_date: None,
    })
    .unwrap();
}

#[test]
fn test_a_day_in_the_life() {
    let db = Database::in_memory().unwrap();
    seed(&db);

    let morning = Utc.with_ymd_and_hms(2026, 3, 31, 8, 0, 0).unwrap();

    // Cash $6,700 minus $1,500 rent leaves ~$52/day of runway: safe tier,
    // and the spare cash above the buffer goes at the 26% card.
    let outcome = current_decision(&db, "ada@example.com", morning).unwrap();
    assert!(outcome.is_new);
    assert_eq!(outcome.decision.risk_level, RiskLevel::Safe);
    assert_eq!(
        outcome.decision.primary_command.command_type,
        CommandType::Pay
    );
    assert_eq!(
        outcome.decision.primary_command.target.as_deref(),
        Some("Visa")
    );
    assert!(outcome.decision.warnings.len() <= 2);

    // The dashboard comparison recommends avalanche at 26% APR
    let debts = db.list_debts().unwrap();
    let comparison = compare(&debts, 0, &[]);
    assert_eq!(comparison.recommendation, DebtStrategy::Avalanche);
    assert!(
        comparison.avalanche.total_interest_cents <= comparison.snowball.total_interest_cents
    );
    assert_eq!(comparison.avalanche.order[0].name, "Visa");
    assert_eq!(comparison.snowball.order[0].name, "Store card");

    // Afternoon: same decision, no recompute
    let afternoon = Utc.with_ymd_and_hms(2026, 3, 31, 18, 30, 0).unwrap();
    let again = current_decision(&db, "ada@example.com", afternoon).unwrap();
    assert!(!again.is_new);
    assert_eq!(again.decision.id, outcome.decision.id);

    // Pay part of the directive's amount onto the Visa
    let extra = outcome.decision.primary_command.amount_cents.unwrap();
    assert!(extra > 5_000);
    let visa_id = debts.iter().find(|d| d.name == "Visa").unwrap().id;
    let visa = db
        .apply_debt_payment(visa_id, 100_000, date(2026, 3, 31))
        .unwrap();
    assert_eq!(visa.balance_cents, 200_000);

    // Next morning the old decision is locked and a fresh one appears
    let next_morning = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap();
    let fresh = current_decision(&db, "ada@example.com", next_morning).unwrap();
    assert!(fresh.is_new);
    assert_ne!(fresh.decision.id, outcome.decision.id);

    let history = db.list_decisions("ada@example.com", 10).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|d| d.is_locked));
}
