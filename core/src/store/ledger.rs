use super::{account::parse_timestamp, BankStore};
use crate::{
    balance::normalize_amount,
    error::{BankError, BankResult},
    factory::{Direction, LedgerEntry},
    preset::Category,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const LEDGER_COLUMNS: &str = "entry_id, account_id, description, category, direction,
        amount, is_certified, is_posted, occurred_at";

fn map_entry(row: &Row<'_>) -> rusqlite::Result<LedgerEntry> {
    let category_raw: String = row.get(3)?;
    let direction_raw: String = row.get(4)?;
    let amount_raw: String = row.get(5)?;
    let occurred_raw: String = row.get(8)?;

    let bad_text = |idx: usize, what: &str| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unrecognized {what}").into(),
        )
    };

    Ok(LedgerEntry {
        entry_id: row.get(0)?,
        account_id: row.get(1)?,
        description: row.get(2)?,
        category: Category::parse(&category_raw).ok_or_else(|| bad_text(3, "category"))?,
        direction: Direction::parse(&direction_raw).ok_or_else(|| bad_text(4, "direction"))?,
        amount: amount_raw
            .parse::<f64>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e)))?,
        is_certified: row.get::<_, i32>(6)? != 0,
        is_posted: row.get::<_, i32>(7)? != 0,
        occurred_at: parse_timestamp(8, &occurred_raw)?,
    })
}

impl BankStore {
    // ── Ledger ────────────────────────────────────────────────────

    pub fn append_transaction(&self, entry: &LedgerEntry) -> BankResult<()> {
        exec_append(self.conn(), entry)
    }

    pub fn get_transaction(&self, entry_id: &str) -> BankResult<Option<LedgerEntry>> {
        let sql = format!("SELECT {LEDGER_COLUMNS} FROM ledger_entry WHERE entry_id = ?1");
        let entry = self
            .conn()
            .query_row(&sql, params![entry_id], map_entry)
            .optional()?;
        Ok(entry)
    }

    /// All entries for one account, newest first.
    pub fn list_transactions(&self, account_id: &str) -> BankResult<Vec<LedgerEntry>> {
        let sql = format!(
            "SELECT {LEDGER_COLUMNS} FROM ledger_entry
             WHERE account_id = ?1
             ORDER BY occurred_at DESC, entry_id DESC"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params![account_id], map_entry)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Cosmetic edit: rewrite amount and/or description in place.
    /// Deliberately does not touch any balance.
    pub fn update_transaction_cosmetic(
        &self,
        entry_id: &str,
        new_amount: Option<f64>,
        new_description: Option<&str>,
    ) -> BankResult<()> {
        let changed = self.conn().execute(
            "UPDATE ledger_entry
             SET amount = COALESCE(?1, amount),
                 description = COALESCE(?2, description)
             WHERE entry_id = ?3",
            params![
                new_amount.map(|a| format!("{:.2}", normalize_amount(a.abs()))),
                new_description,
                entry_id
            ],
        )?;
        if changed == 0 {
            return Err(BankError::not_found("ledger entry", entry_id));
        }
        Ok(())
    }

    pub fn transaction_count(&self, account_id: &str) -> BankResult<i64> {
        self.conn()
            .query_row(
                "SELECT COUNT(*) FROM ledger_entry WHERE account_id = ?1",
                params![account_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

pub(super) fn exec_append(conn: &Connection, entry: &LedgerEntry) -> BankResult<()> {
    conn.execute(
        "INSERT INTO ledger_entry (
            entry_id, account_id, description, category, direction,
            amount, is_certified, is_posted, occurred_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.entry_id,
            entry.account_id,
            entry.description,
            entry.category.as_str(),
            entry.direction.as_str(),
            entry.amount_string(),
            if entry.is_certified { 1i32 } else { 0i32 },
            if entry.is_posted { 1i32 } else { 0i32 },
            entry.occurred_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}
