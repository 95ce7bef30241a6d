use super::{account::parse_timestamp, BankStore};
use crate::{error::BankResult, referral::ReferralActivation};
use rusqlite::{params, Connection, OptionalExtension, Row};

fn map_activation(row: &Row<'_>) -> rusqlite::Result<ReferralActivation> {
    let activated_raw: String = row.get(3)?;
    Ok(ReferralActivation {
        referrer_id: row.get(0)?,
        referred_id: row.get(1)?,
        bonus_amount: row.get(2)?,
        activated_at: parse_timestamp(3, &activated_raw)?,
    })
}

impl BankStore {
    // ── Referral activations ──────────────────────────────────────

    pub fn activation_for_referred(
        &self,
        referred_id: &str,
    ) -> BankResult<Option<ReferralActivation>> {
        let activation = self
            .conn()
            .query_row(
                "SELECT referrer_id, referred_id, bonus_amount, activated_at
                 FROM referral_activation WHERE referred_id = ?1",
                params![referred_id],
                map_activation,
            )
            .optional()?;
        Ok(activation)
    }

    pub fn activation_count(&self) -> BankResult<i64> {
        self.conn()
            .query_row("SELECT COUNT(*) FROM referral_activation", [], |row| {
                row.get(0)
            })
            .map_err(Into::into)
    }
}

pub(super) fn exec_insert_activation(
    conn: &Connection,
    activation: &ReferralActivation,
) -> BankResult<()> {
    conn.execute(
        "INSERT INTO referral_activation (referrer_id, referred_id, bonus_amount, activated_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            activation.referrer_id,
            activation.referred_id,
            activation.bonus_amount,
            activation.activated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}
