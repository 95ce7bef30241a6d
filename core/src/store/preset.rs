use super::BankStore;
use crate::{
    error::BankResult,
    factory::Direction,
    preset::{builtin_catalog, Category, Preset},
};
use rusqlite::{params, OptionalExtension, Row};

const PRESET_COLUMNS: &str = "preset_id, description, direction, category,
        min_amount, max_amount, fixed_amounts, is_custom";

fn map_preset(row: &Row<'_>) -> rusqlite::Result<Preset> {
    let direction_raw: String = row.get(2)?;
    let category_raw: String = row.get(3)?;
    let fixed_raw: Option<String> = row.get(6)?;

    let bad_text = |idx: usize, what: &str| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unrecognized {what}").into(),
        )
    };

    let fixed_amounts = match fixed_raw {
        Some(json) => Some(serde_json::from_str::<Vec<f64>>(&json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };

    Ok(Preset {
        preset_id: row.get(0)?,
        description: row.get(1)?,
        direction: Direction::parse(&direction_raw).ok_or_else(|| bad_text(2, "direction"))?,
        category: Category::parse(&category_raw).ok_or_else(|| bad_text(3, "category"))?,
        min_amount: row.get(4)?,
        max_amount: row.get(5)?,
        fixed_amounts,
        is_custom: row.get::<_, i32>(7)? != 0,
    })
}

impl BankStore {
    // ── Preset catalog ────────────────────────────────────────────

    pub fn upsert_preset(&self, preset: &Preset) -> BankResult<()> {
        let fixed_json = preset
            .fixed_amounts
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        self.conn().execute(
            "INSERT INTO preset (
                preset_id, description, direction, category,
                min_amount, max_amount, fixed_amounts, is_custom
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(preset_id) DO UPDATE SET
                description = excluded.description,
                direction = excluded.direction,
                category = excluded.category,
                min_amount = excluded.min_amount,
                max_amount = excluded.max_amount,
                fixed_amounts = excluded.fixed_amounts,
                is_custom = excluded.is_custom",
            params![
                preset.preset_id,
                preset.description,
                preset.direction.as_str(),
                preset.category.as_str(),
                preset.min_amount,
                preset.max_amount,
                fixed_json,
                if preset.is_custom { 1i32 } else { 0i32 },
            ],
        )?;
        Ok(())
    }

    pub fn get_preset(&self, preset_id: &str) -> BankResult<Option<Preset>> {
        let sql = format!("SELECT {PRESET_COLUMNS} FROM preset WHERE preset_id = ?1");
        let preset = self
            .conn()
            .query_row(&sql, params![preset_id], map_preset)
            .optional()?;
        Ok(preset)
    }

    /// The built-in expense catalog the quick-random generator draws
    /// from. Custom presets never enter this pool.
    pub fn quick_random_presets(&self) -> BankResult<Vec<Preset>> {
        let sql = format!(
            "SELECT {PRESET_COLUMNS} FROM preset
             WHERE direction = 'expense' AND is_custom = 0
             ORDER BY preset_id ASC"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map([], map_preset)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn preset_count(&self) -> BankResult<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM preset", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Insert the built-in catalog if this database has none yet.
    /// Idempotent; called from migrate().
    pub(super) fn seed_builtin_presets(&self) -> BankResult<()> {
        let builtin_count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM preset WHERE is_custom = 0",
            [],
            |row| row.get(0),
        )?;
        if builtin_count > 0 {
            return Ok(());
        }
        for preset in builtin_catalog()? {
            self.upsert_preset(&preset)?;
        }
        log::debug!("seeded built-in preset catalog");
        Ok(())
    }
}
