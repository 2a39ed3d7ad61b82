//! Decision state cache
//!
//! One unlocked decision per user at a time. A request inside the decision's
//! UTC day returns it unchanged; the first request past expiry locks it into
//! history and computes a fresh one. The storage-level unique index makes
//! simultaneous computes safe: the losing insert re-reads the winner.

use chrono::{DateTime, NaiveTime, Utc};
use tracing::debug;

use crate::db::{is_unique_violation, Database};
use crate::error::{Error, Result};
use crate::models::DecisionState;

use super::{engine, FinancialSnapshot};

/// A decision plus whether this request created it
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub decision: DecisionState,
    pub is_new: bool,
}

/// The instant a decision computed at `at` stops being valid: the first
/// midnight (UTC) after it. Validity is `now < expires_at`.
pub fn end_of_utc_day(at: DateTime<Utc>) -> DateTime<Utc> {
    let next_day = at.date_naive() + chrono::Duration::days(1);
    next_day.and_time(NaiveTime::MIN).and_utc()
}

/// Returns the user's decision for the moment `now`, computing and caching
/// a new one when none is valid.
pub fn current_decision(
    db: &Database,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<DecisionOutcome> {
    if let Some(existing) = db.latest_unlocked_decision(user_id)? {
        if now < existing.expires_at {
            return Ok(DecisionOutcome {
                decision: existing,
                is_new: false,
            });
        }

        // Expired: lock it into history before computing a successor
        debug!(decision_id = existing.id, user = user_id, "Locking expired decision");
        db.lock_decision(existing.id)?;
    }

    let today = now.date_naive();
    let snapshot = FinancialSnapshot::load(db, today)?;
    let computed = engine::evaluate(&snapshot, today);

    match db.insert_decision(user_id, &computed, now, end_of_utc_day(now)) {
        Ok(decision) => Ok(DecisionOutcome {
            decision,
            is_new: true,
        }),
        Err(Error::Database(e)) if is_unique_violation(&e) => {
            // A simultaneous request computed from the same inputs and won
            // the insert; its decision is just as valid as ours.
            debug!(user = user_id, "Lost decision compute race, returning winner");
            let winner = db
                .latest_unlocked_decision(user_id)?
                .ok_or_else(|| Error::NotFound(format!("decision for {}", user_id)))?;
            Ok(DecisionOutcome {
                decision: winner,
                is_new: false,
            })
        }
        Err(e) => Err(e),
    }
}

/// Marks a decision acknowledged at `now`. Idempotent; the command and
/// expiry are never touched.
pub fn acknowledge(db: &Database, decision_id: i64, now: DateTime<Utc>) -> Result<DecisionState> {
    db.acknowledge_decision(decision_id, now)
}

impl FinancialSnapshot {
    /// Assembles the engine's input from storage: accounts, the trailing
    /// 30-day expense sum, recurring items, and debts.
    pub fn load(db: &Database, today: chrono::NaiveDate) -> Result<Self> {
        let window_start = today - chrono::Duration::days(30);
        Ok(Self {
            accounts: db.list_accounts()?,
            expenses_30d_cents: db.expense_total_since(window_start)?,
            recurring: db.list_recurring()?,
            debts: db.list_debts()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, NewRecurringItem, TransactionKind};
    use chrono::TimeZone;

    fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn seeded_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.upsert_account("Checking", AccountType::Checking, 250_000)
            .unwrap();
        db.insert_recurring(&NewRecurringItem {
            name: "Rent".to_string(),
            kind: TransactionKind::Expense,
            amount_cents: 120_000,
            next_due_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
        })
        .unwrap();
        db
    }

    #[test]
    fn test_end_of_utc_day_is_next_midnight() {
        let at = noon(2026, 3, 10);
        let expiry = end_of_utc_day(at);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap());

        // A tick before midnight still expires at the same boundary
        let late = Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 59).unwrap();
        assert_eq!(end_of_utc_day(late), expiry);
    }

    #[test]
    fn test_first_call_computes_and_caches() {
        let db = seeded_db();
        let now = noon(2026, 3, 10);

        let outcome = current_decision(&db, "ada@example.com", now).unwrap();
        assert!(outcome.is_new);
        assert!(!outcome.decision.is_locked);
        assert_eq!(outcome.decision.expires_at, end_of_utc_day(now));

        // Second call inside the same day returns the identical decision
        let later = noon(2026, 3, 10) + chrono::Duration::hours(5);
        let second = current_decision(&db, "ada@example.com", later).unwrap();
        assert!(!second.is_new);
        assert_eq!(second.decision.id, outcome.decision.id);
        assert_eq!(
            second.decision.primary_command,
            outcome.decision.primary_command
        );
    }

    #[test]
    fn test_next_day_locks_and_recomputes() {
        let db = seeded_db();

        let first = current_decision(&db, "ada@example.com", noon(2026, 3, 10)).unwrap();
        let second = current_decision(&db, "ada@example.com", noon(2026, 3, 11)).unwrap();

        assert!(second.is_new);
        assert_ne!(second.decision.id, first.decision.id);

        // Yesterday's decision is locked history, not deleted
        let old = db.get_decision(first.decision.id).unwrap().unwrap();
        assert!(old.is_locked);

        let history = db.list_decisions("ada@example.com", 10).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_decisions_are_per_user() {
        let db = seeded_db();
        let now = noon(2026, 3, 10);

        let ada = current_decision(&db, "ada@example.com", now).unwrap();
        let ben = current_decision(&db, "ben@example.com", now).unwrap();
        assert!(ada.is_new);
        assert!(ben.is_new);
        assert_ne!(ada.decision.id, ben.decision.id);
    }

    #[test]
    fn test_second_unlocked_insert_loses_to_the_index() {
        let db = seeded_db();
        let now = noon(2026, 3, 10);
        let outcome = current_decision(&db, "ada@example.com", now).unwrap();

        // A racing compute would attempt exactly this insert
        let snapshot = FinancialSnapshot::load(&db, now.date_naive()).unwrap();
        let computed = engine::evaluate(&snapshot, now.date_naive());
        let err = db
            .insert_decision("ada@example.com", &computed, now, end_of_utc_day(now))
            .unwrap_err();
        match err {
            Error::Database(e) => assert!(is_unique_violation(&e)),
            other => panic!("expected constraint violation, got {:?}", other),
        }

        // The cache path hides the race entirely
        let retry = current_decision(&db, "ada@example.com", now).unwrap();
        assert!(!retry.is_new);
        assert_eq!(retry.decision.id, outcome.decision.id);
    }

    #[test]
    fn test_acknowledge_is_idempotent() {
        let db = seeded_db();
        let now = noon(2026, 3, 10);
        let outcome = current_decision(&db, "ada@example.com", now).unwrap();

        let first = acknowledge(&db, outcome.decision.id, now).unwrap();
        assert_eq!(first.acknowledged_at, Some(now));
        assert_eq!(first.primary_command, outcome.decision.primary_command);

        // A later acknowledgement keeps the original timestamp
        let later = now + chrono::Duration::hours(2);
        let second = acknowledge(&db, outcome.decision.id, later).unwrap();
        assert_eq!(second.acknowledged_at, Some(now));
    }

    #[test]
    fn test_acknowledge_unknown_decision() {
        let db = seeded_db();
        let err = acknowledge(&db, 4_242, noon(2026, 3, 10)).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
