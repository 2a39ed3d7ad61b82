//! Transaction operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionKind};

fn map_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get(2)?;
    let date_str: String = row.get(5)?;
    let created_at_str: String = row.get(6)?;

    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        kind: kind_str.parse().unwrap_or(TransactionKind::Expense),
        amount_cents: row.get(3)?,
        description: row.get(4)?,
        date: parse_date(&date_str).unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Record a transaction
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<i64> {
        if tx.amount_cents <= 0 {
            return Err(Error::InvalidInput(
                "transaction amount must be positive".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (account_id, kind, amount_cents, description, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                tx.account_id,
                tx.kind.as_str(),
                tx.amount_cents,
                tx.description,
                tx.date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List recent transactions, newest first
    pub fn list_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, account_id, kind, amount_cents, description, date, created_at
            FROM transactions
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let transactions = stmt
            .query_map(params![limit], map_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Sum of expense transactions dated on or after `since`
    pub fn expense_total_since(&self, since: NaiveDate) -> Result<i64> {
        let conn = self.conn()?;
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM transactions WHERE kind = 'expense' AND date >= ?",
            params![since.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
