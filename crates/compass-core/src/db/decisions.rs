//! Decision persistence: the expiry/lock lifecycle storage

use chrono::{DateTime, Utc};
use rusqlite::params;

use super::{parse_date, parse_datetime, Database};
use crate::decision::ComputedDecision;
use crate::error::{Error, Result};
use crate::models::{
    CommandType, DecisionState, NextAction, PrimaryCommand, RiskLevel,
};

const DECISION_COLUMNS: &str = "id, user_id, risk_level, command_type, command_text, \
     command_amount_cents, command_target, command_date, warnings, next_action_text, \
     next_action_url, basis, computed_at, expires_at, is_locked, acknowledged_at";

fn map_decision(row: &rusqlite::Row<'_>) -> rusqlite::Result<DecisionState> {
    let risk_str: String = row.get(2)?;
    let command_type_str: String = row.get(3)?;
    let command_date_str: Option<String> = row.get(7)?;
    let warnings_json: String = row.get(8)?;
    let basis_json: String = row.get(11)?;
    let computed_at_str: String = row.get(12)?;
    let expires_at_str: String = row.get(13)?;
    let acknowledged_at_str: Option<String> = row.get(15)?;

    Ok(DecisionState {
        id: row.get(0)?,
        user_id: row.get(1)?,
        risk_level: risk_str.parse().unwrap_or(RiskLevel::Safe),
        primary_command: PrimaryCommand {
            command_type: command_type_str.parse().unwrap_or(CommandType::Wait),
            text: row.get(4)?,
            amount_cents: row.get(5)?,
            target: row.get(6)?,
            date: command_date_str.as_deref().and_then(parse_date),
        },
        warnings: serde_json::from_str(&warnings_json).unwrap_or_default(),
        next_action: NextAction {
            text: row.get(9)?,
            url: row.get(10)?,
        },
        basis: serde_json::from_str(&basis_json).unwrap_or(serde_json::Value::Null),
        computed_at: parse_datetime(&computed_at_str),
        expires_at: parse_datetime(&expires_at_str),
        is_locked: row.get(14)?,
        acknowledged_at: acknowledged_at_str.map(|s| parse_datetime(&s)),
    })
}

/// Whether an insert died on the one-unlocked-decision-per-user index
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl Database {
    /// Persist a freshly computed decision as the user's unlocked one.
    ///
    /// Fails with a constraint violation if an unlocked decision already
    /// exists for the user; callers treat that as losing a benign race and
    /// re-read the winner (see `decision::cache`).
    pub fn insert_decision(
        &self,
        user_id: &str,
        computed: &ComputedDecision,
        computed_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<DecisionState> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO decisions (
                user_id, risk_level, command_type, command_text, command_amount_cents,
                command_target, command_date, warnings, next_action_text, next_action_url,
                basis, computed_at, expires_at, is_locked
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)
            "#,
            params![
                user_id,
                computed.risk_level.as_str(),
                computed.primary_command.command_type.as_str(),
                computed.primary_command.text,
                computed.primary_command.amount_cents,
                computed.primary_command.target,
                computed.primary_command.date.map(|d| d.to_string()),
                serde_json::to_string(&computed.warnings)?,
                computed.next_action.text,
                computed.next_action.url,
                serde_json::to_string(&computed.basis)?,
                computed_at.to_rfc3339(),
                expires_at.to_rfc3339(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_decision(id)?
            .ok_or_else(|| Error::NotFound(format!("decision {}", id)))
    }

    /// The user's current unlocked decision, if any
    pub fn latest_unlocked_decision(&self, user_id: &str) -> Result<Option<DecisionState>> {
        let conn = self.conn()?;
        let decision = conn
            .query_row(
                &format!(
                    "SELECT {} FROM decisions WHERE user_id = ? AND is_locked = 0 \
                     ORDER BY computed_at DESC LIMIT 1",
                    DECISION_COLUMNS
                ),
                params![user_id],
                map_decision,
            )
            .ok();

        Ok(decision)
    }

    /// Get a decision by ID
    pub fn get_decision(&self, id: i64) -> Result<Option<DecisionState>> {
        let conn = self.conn()?;
        let decision = conn
            .query_row(
                &format!("SELECT {} FROM decisions WHERE id = ?", DECISION_COLUMNS),
                params![id],
                map_decision,
            )
            .ok();

        Ok(decision)
    }

    /// Lock a superseded decision. Locked decisions are never deleted; they
    /// are the user's decision history.
    pub fn lock_decision(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE decisions SET is_locked = 1 WHERE id = ?",
            params![id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("decision {}", id)));
        }
        Ok(())
    }

    /// Record the user's acknowledgement. Idempotent: a second call keeps
    /// the original timestamp, and the command is never touched.
    pub fn acknowledge_decision(&self, id: i64, now: DateTime<Utc>) -> Result<DecisionState> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE decisions SET acknowledged_at = COALESCE(acknowledged_at, ?) WHERE id = ?",
            params![now.to_rfc3339(), id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("decision {}", id)));
        }
        drop(conn);

        self.get_decision(id)?
            .ok_or_else(|| Error::NotFound(format!("decision {}", id)))
    }

    /// List a user's decisions, newest first, locked history included
    pub fn list_decisions(&self, user_id: &str, limit: i64) -> Result<Vec<DecisionState>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM decisions WHERE user_id = ? \
             ORDER BY computed_at DESC, id DESC LIMIT ?",
            DECISION_COLUMNS
        ))?;

        let decisions = stmt
            .query_map(params![user_id, limit], map_decision)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(decisions)
    }
}
