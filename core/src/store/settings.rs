use super::BankStore;
use crate::error::BankResult;
use rusqlite::{params, OptionalExtension};

impl BankStore {
    // ── App settings ──────────────────────────────────────────────

    pub fn set_setting(&self, key: &str, value: &str) -> BankResult<()> {
        self.conn().execute(
            "INSERT INTO app_setting (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> BankResult<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM app_setting WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Numeric setting with a fallback. A present-but-unparseable value
    /// falls back too, with a warning — settings are operator input.
    pub fn setting_f64_or(&self, key: &str, default: f64) -> BankResult<f64> {
        match self.get_setting(key)? {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    log::warn!("setting '{key}' has non-numeric value '{raw}', using default");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }
}
