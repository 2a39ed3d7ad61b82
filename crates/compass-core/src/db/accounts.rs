//! Account operations

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Account, AccountType};

fn map_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let type_str: String = row.get(2)?;
    let created_at_str: String = row.get(4)?;

    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        account_type: type_str.parse().unwrap_or(AccountType::Checking),
        balance_cents: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create an account, or update the type/balance of one with this name
    pub fn upsert_account(
        &self,
        name: &str,
        account_type: AccountType,
        balance_cents: i64,
    ) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM accounts WHERE name = ?",
                params![name],
                |row| row.get(0),
            )
            .ok();

        if let Some(id) = existing {
            conn.execute(
                "UPDATE accounts SET account_type = ?, balance_cents = ? WHERE id = ?",
                params![account_type.as_str(), balance_cents, id],
            )?;
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO accounts (name, account_type, balance_cents) VALUES (?, ?, ?)",
            params![name, account_type.as_str(), balance_cents],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List all accounts
    pub fn list_accounts(&self) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, account_type, balance_cents, created_at FROM accounts ORDER BY name",
        )?;

        let accounts = stmt
            .query_map([], map_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    /// Get an account by ID
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                "SELECT id, name, account_type, balance_cents, created_at FROM accounts WHERE id = ?",
                params![id],
                map_account,
            )
            .ok();

        Ok(account)
    }

    /// Set an account's balance
    pub fn set_account_balance(&self, id: i64, balance_cents: i64) -> Result<()> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE accounts SET balance_cents = ? WHERE id = ?",
            params![balance_cents, id],
        )?;
        if updated == 0 {
            return Err(Error::NotFound(format!("account {}", id)));
        }
        Ok(())
    }

    /// Delete an account; its transactions keep a dangling reference cleared
    pub fn delete_account(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;

        conn.execute("BEGIN TRANSACTION", [])?;

        let result = (|| {
            conn.execute(
                "UPDATE transactions SET account_id = NULL WHERE account_id = ?",
                params![id],
            )?;
            conn.execute("DELETE FROM accounts WHERE id = ?", params![id])?;
            Ok(())
        })();

        match result {
            Ok(()) => {
                conn.execute("COMMIT", [])?;
                Ok(())
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }
}
