//! Debt operations

use chrono::NaiveDate;
use rusqlite::params;
use tracing::info;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Debt, DebtStatus, NewDebt, NewTransaction, TransactionKind};

const DEBT_COLUMNS: &str =
    "id, name, balance_cents, apr_percent, minimum_payment_cents, next_due_date, status, created_at";

fn map_debt(row: &rusqlite::Row<'_>) -> rusqlite::Result<Debt> {
    let due_str: Option<String> = row.get(5)?;
    let status_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Debt {
        id: row.get(0)?,
        name: row.get(1)?,
        balance_cents: row.get(2)?,
        apr_percent: row.get(3)?,
        minimum_payment_cents: row.get(4)?,
        next_due_date: due_str.as_deref().and_then(parse_date),
        status: status_str.parse().unwrap_or(DebtStatus::Active),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create a debt
    pub fn insert_debt(&self, debt: &NewDebt) -> Result<i64> {
        if debt.balance_cents < 0 {
            return Err(Error::InvalidInput(
                "debt balance cannot be negative".to_string(),
            ));
        }
        if debt.apr_percent < 0.0 {
            return Err(Error::InvalidInput("APR cannot be negative".to_string()));
        }
        if debt.minimum_payment_cents.is_some_and(|m| m < 0) {
            return Err(Error::InvalidInput(
                "minimum payment cannot be negative".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO debts (name, balance_cents, apr_percent, minimum_payment_cents, next_due_date, status)
            VALUES (?, ?, ?, ?, ?, 'active')
            "#,
            params![
                debt.name,
                debt.balance_cents,
                debt.apr_percent,
                debt.minimum_payment_cents,
                debt.next_due_date.map(|d| d.to_string()),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all debts, largest balance first
    pub fn list_debts(&self) -> Result<Vec<Debt>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM debts ORDER BY balance_cents DESC, id",
            DEBT_COLUMNS
        ))?;

        let debts = stmt
            .query_map([], map_debt)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(debts)
    }

    /// Get a debt by ID
    pub fn get_debt(&self, id: i64) -> Result<Option<Debt>> {
        let conn = self.conn()?;
        let debt = conn
            .query_row(
                &format!("SELECT {} FROM debts WHERE id = ?", DEBT_COLUMNS),
                params![id],
                map_debt,
            )
            .ok();

        Ok(debt)
    }

    /// Update a debt's lifecycle status
    pub fn update_debt_status(&self, id: i64, status: DebtStatus) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE debts SET status = ? WHERE id = ?",
            params![status.as_str(), id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("debt {}", id)));
        }
        Ok(())
    }

    /// Apply a payment to a debt: the balance drops (never below zero), a
    /// matching expense transaction is recorded, and a debt reaching zero
    /// flips to paid_off.
    pub fn apply_debt_payment(
        &self,
        id: i64,
        amount_cents: i64,
        date: NaiveDate,
    ) -> Result<Debt> {
        if amount_cents <= 0 {
            return Err(Error::InvalidInput(
                "payment amount must be positive".to_string(),
            ));
        }

        let debt = self
            .get_debt(id)?
            .ok_or_else(|| Error::NotFound(format!("debt {}", id)))?;

        let new_balance = (debt.balance_cents - amount_cents).max(0);
        let new_status = if new_balance == 0 {
            DebtStatus::PaidOff
        } else {
            debt.status
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE debts SET balance_cents = ?, status = ? WHERE id = ?",
            params![new_balance, new_status.as_str(), id],
        )?;
        drop(conn);

        self.insert_transaction(&NewTransaction {
            account_id: None,
            kind: TransactionKind::Expense,
            amount_cents,
            description: format!("Payment: {}", debt.name),
            date,
        })?;

        if new_status == DebtStatus::PaidOff && debt.status != DebtStatus::PaidOff {
            info!(debt = %debt.name, "Debt paid off");
        }

        self.get_debt(id)?
            .ok_or_else(|| Error::NotFound(format!("debt {}", id)))
    }
}
