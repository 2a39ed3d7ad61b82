//! Recurring item operations

use rusqlite::params;

use super::{parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewRecurringItem, RecurringItem, TransactionKind};

fn map_recurring(row: &rusqlite::Row<'_>) -> rusqlite::Result<RecurringItem> {
    let kind_str: String = row.get(2)?;
    let due_str: String = row.get(4)?;
    let created_at_str: String = row.get(5)?;

    Ok(RecurringItem {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: kind_str.parse().unwrap_or(TransactionKind::Expense),
        amount_cents: row.get(3)?,
        next_due_date: parse_date(&due_str).unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create a recurring income or bill item
    pub fn insert_recurring(&self, item: &NewRecurringItem) -> Result<i64> {
        if item.amount_cents <= 0 {
            return Err(Error::InvalidInput(
                "recurring amount must be positive".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO recurring_items (name, kind, amount_cents, next_due_date)
            VALUES (?, ?, ?, ?)
            "#,
            params![
                item.name,
                item.kind.as_str(),
                item.amount_cents,
                item.next_due_date.to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all recurring items, soonest due first
    pub fn list_recurring(&self) -> Result<Vec<RecurringItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, kind, amount_cents, next_due_date, created_at
            FROM recurring_items
            ORDER BY next_due_date, id
            "#,
        )?;

        let items = stmt
            .query_map([], map_recurring)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Push a recurring item's next due date forward
    pub fn set_recurring_due_date(
        &self,
        id: i64,
        next_due_date: chrono::NaiveDate,
    ) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE recurring_items SET next_due_date = ? WHERE id = ?",
            params![next_due_date.to_string(), id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("recurring item {}", id)));
        }
        Ok(())
    }

    /// Delete a recurring item
    pub fn delete_recurring(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM recurring_items WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("recurring item {}", id)));
        }
        Ok(())
    }
}
