use super::BankStore;
use crate::{balance::BalanceTriple, error::BankResult, types::AccountId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// One account record as stored. The three balances are grouped in a
/// `BalanceTriple` so every mutation path moves display and tracked
/// through the same code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub display_name: String,
    pub balances: BalanceTriple,
    /// Lifetime sum of admin top-ups. Never decreases.
    pub total_recharged: f64,
    pub referred_by: Option<AccountId>,
    pub referral_activated: bool,
    pub created_at: DateTime<Utc>,
}

/// Timestamps cross the SQL boundary as RFC 3339 text.
pub(super) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn map_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    let created_raw: String = row.get(8)?;
    Ok(Account {
        account_id: row.get(0)?,
        display_name: row.get(1)?,
        balances: BalanceTriple {
            display: row.get(2)?,
            tracked: row.get(3)?,
            certified: row.get(4)?,
        },
        total_recharged: row.get(5)?,
        referred_by: row.get(6)?,
        referral_activated: row.get::<_, i32>(7)? != 0,
        created_at: parse_timestamp(8, &created_raw)?,
    })
}

const ACCOUNT_COLUMNS: &str = "account_id, display_name, display_balance, tracked_balance,
        certified_balance, total_recharged, referred_by, referral_activated, created_at";

impl BankStore {
    // ── Account ───────────────────────────────────────────────────

    pub fn insert_account(&self, account: &Account) -> BankResult<()> {
        self.conn().execute(
            "INSERT INTO account (
                account_id, display_name, display_balance, tracked_balance,
                certified_balance, total_recharged, referred_by,
                referral_activated, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                account.account_id,
                account.display_name,
                account.balances.display,
                account.balances.tracked,
                account.balances.certified,
                account.total_recharged,
                account.referred_by,
                if account.referral_activated { 1i32 } else { 0i32 },
                account.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_account(&self, account_id: &str) -> BankResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM account WHERE account_id = ?1");
        let account = self
            .conn()
            .query_row(&sql, params![account_id], map_account)
            .optional()?;
        Ok(account)
    }

    pub fn all_accounts(&self) -> BankResult<Vec<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY account_id ASC");
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map([], map_account)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn save_account_balances(
        &self,
        account_id: &str,
        balances: &BalanceTriple,
    ) -> BankResult<()> {
        exec_save_balances(self.conn(), account_id, balances)
    }

    pub fn account_count(&self) -> BankResult<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM account", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

pub(super) fn exec_save_balances(
    conn: &Connection,
    account_id: &str,
    balances: &BalanceTriple,
) -> BankResult<()> {
    conn.execute(
        "UPDATE account
         SET display_balance = ?1, tracked_balance = ?2, certified_balance = ?3
         WHERE account_id = ?4",
        params![
            balances.display,
            balances.tracked,
            balances.certified,
            account_id
        ],
    )?;
    Ok(())
}

pub(super) fn exec_set_total_recharged(
    conn: &Connection,
    account_id: &str,
    total_recharged: f64,
) -> BankResult<()> {
    conn.execute(
        "UPDATE account SET total_recharged = ?1 WHERE account_id = ?2",
        params![total_recharged, account_id],
    )?;
    Ok(())
}

pub(super) fn exec_set_referral_activated(conn: &Connection, account_id: &str) -> BankResult<()> {
    conn.execute(
        "UPDATE account SET referral_activated = 1 WHERE account_id = ?1",
        params![account_id],
    )?;
    Ok(())
}
