//! Admin top-ups and the referral trigger.
//!
//! A top-up certifies real money into an account: all three balances
//! rise and the lifetime `total_recharged` grows (it never decreases).
//! When a top-up pushes the lifetime total across REFERRAL_THRESHOLD
//! for a referred, not-yet-activated account, the referrer is credited
//! a one-time bonus. The bonus can fire at most once per referred
//! account, ever — guarded by the `referral_activated` flag and backed
//! by the UNIQUE activation row.

use crate::{
    error::{BankError, BankResult},
    factory::{self, Direction, LedgerEntry},
    preset::Category,
    store::{Account, BankStore},
    types::AccountId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime top-up total that triggers the referrer bonus.
pub const REFERRAL_THRESHOLD: f64 = 2.0;

/// Default bonus credited to the referrer; overridable per deployment
/// through the app-setting below.
pub const DEFAULT_REFERRAL_BONUS: f64 = 200.0;
pub const BONUS_SETTING_KEY: &str = "referral.bonus_amount";

/// One-shot record of a fired referral bonus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralActivation {
    pub referrer_id: AccountId,
    pub referred_id: AccountId,
    pub bonus_amount: f64,
    pub activated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TopUpOutcome {
    pub account: Account,
    pub entry: LedgerEntry,
    pub referral_bonus_awarded: bool,
    pub referrer_name: Option<String>,
}

pub fn top_up(store: &BankStore, account_id: &str, amount: f64) -> BankResult<TopUpOutcome> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BankError::invalid_amount("top-up amount must be positive"));
    }

    let mut account = store
        .get_account(account_id)?
        .ok_or_else(|| BankError::not_found("account", account_id))?;

    let previous_total = account.total_recharged;
    let new_total = previous_total + amount;

    account.balances.apply_certified_income(amount);
    account.total_recharged = new_total;

    let entry = factory::build_entry(
        account_id,
        "Account top-up",
        Category::TopUp,
        Direction::Income,
        amount,
        true,
        true,
    );

    // Decide the bonus BEFORE committing anything. The crossing is
    // one-shot (total_recharged never decreases), so the top-up and
    // the bonus must land in the same transaction: a bonus failure
    // that left the top-up committed would consume the crossing with
    // the bonus lost forever.
    let crossed = previous_total < REFERRAL_THRESHOLD && new_total >= REFERRAL_THRESHOLD;
    let bonus = if crossed && account.referred_by.is_some() && !account.referral_activated {
        prepare_referral_bonus(store, &account)?
    } else {
        None
    };

    let mut referral_bonus_awarded = false;
    let mut referrer_name = None;

    match &bonus {
        Some(prepared) => {
            store.commit_top_up_with_bonus(
                account_id,
                &account.balances,
                new_total,
                &entry,
                &prepared.referrer.balances,
                &prepared.bonus_entry,
                &prepared.activation,
            )?;
            account.referral_activated = true;
            referral_bonus_awarded = true;
            referrer_name = Some(prepared.referrer.display_name.clone());
            log::info!(
                "referral bonus {:.2} credited to '{}' for '{account_id}'",
                prepared.activation.bonus_amount,
                prepared.referrer.account_id
            );
        }
        None => store.commit_top_up(account_id, &account.balances, new_total, &entry)?,
    }

    Ok(TopUpOutcome {
        account,
        entry,
        referral_bonus_awarded,
        referrer_name,
    })
}

struct PreparedBonus {
    referrer: Account,
    bonus_entry: LedgerEntry,
    activation: ReferralActivation,
}

/// Stage the referrer credit and the activation record without writing
/// anything. Returns None when the back-reference points at a deleted
/// account (the top-up itself still stands).
fn prepare_referral_bonus(
    store: &BankStore,
    referred: &Account,
) -> BankResult<Option<PreparedBonus>> {
    let referrer_id = match &referred.referred_by {
        Some(id) => id.clone(),
        None => return Ok(None),
    };

    let Some(mut referrer) = store.get_account(&referrer_id)? else {
        log::warn!(
            "referral on '{}' points at missing account '{referrer_id}', skipping bonus",
            referred.account_id
        );
        return Ok(None);
    };

    let bonus = store.setting_f64_or(BONUS_SETTING_KEY, DEFAULT_REFERRAL_BONUS)?;
    referrer.balances.apply_certified_income(bonus);

    let bonus_entry = factory::build_entry(
        &referrer.account_id,
        &format!("Referral bonus for inviting {}", referred.display_name),
        Category::ReferralBonus,
        Direction::Income,
        bonus,
        true,
        true,
    );
    let activation = ReferralActivation {
        referrer_id: referrer.account_id.clone(),
        referred_id: referred.account_id.clone(),
        bonus_amount: bonus,
        activated_at: Utc::now(),
    };

    Ok(Some(PreparedBonus {
        referrer,
        bonus_entry,
        activation,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BankEngine;

    // A stray activation row for "new" (flag still unset) makes the
    // bonus insert hit the UNIQUE constraint mid-commit.
    #[test]
    fn failed_bonus_rolls_back_the_whole_top_up() {
        let mut engine = BankEngine::in_memory(3).unwrap();
        engine.create_account("ref", "Referrer", None).unwrap();
        engine
            .create_account("new", "Newcomer", Some("ref".into()))
            .unwrap();
        engine
            .store()
            .conn()
            .execute(
                "INSERT INTO referral_activation
                     (referrer_id, referred_id, bonus_amount, activated_at)
                 VALUES ('ref', 'new', 0, '2020-01-01T00:00:00+00:00')",
                [],
            )
            .unwrap();

        let err = engine.top_up("new", 5.0).unwrap_err();
        assert!(matches!(err, BankError::Database(_)));

        // Nothing from the rejected top-up may survive.
        let account = engine.store().get_account("new").unwrap().unwrap();
        assert_eq!(account.total_recharged, 0.0);
        assert_eq!(account.balances.certified, 0.0);
        assert!(!account.referral_activated);
        assert_eq!(engine.store().transaction_count("new").unwrap(), 0);

        let referrer = engine.store().get_account("ref").unwrap().unwrap();
        assert_eq!(referrer.balances.certified, 0.0);
        assert_eq!(engine.store().transaction_count("ref").unwrap(), 0);
    }

    // A later non-crossing top-up must not need the bonus path at all.
    #[test]
    fn non_crossing_top_up_commits_without_the_bonus_bundle() {
        let mut engine = BankEngine::in_memory(9).unwrap();
        engine.create_account("ref", "Referrer", None).unwrap();
        engine
            .create_account("new", "Newcomer", Some("ref".into()))
            .unwrap();

        engine.top_up("new", 10.0).unwrap();
        let outcome = engine.top_up("new", 4.0).unwrap();
        assert!(!outcome.referral_bonus_awarded);
        assert_eq!(outcome.account.total_recharged, 14.0);
    }
}
