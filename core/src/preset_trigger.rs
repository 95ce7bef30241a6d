//! The preset-trigger generator — "fire this preset" by id.
//!
//! Unlike the quick-random path, a triggered preset moves ALL THREE
//! balances:
//!   - expense: treated as spending certified money; requires a
//!     positive certified balance and rejects amounts above it.
//!   - income: bounded by the recharge margin
//!     max(0, total_recharged - certified) — how much of the account's
//!     lifetime top-ups has not yet been replayed as certified income.
//!
//! The asymmetry against quick-random (only this expense path touches
//! certified) is a product decision; do not unify the two.

use crate::{
    balance::{self, cap_income},
    error::{BankError, BankResult},
    factory::{self, Direction, LedgerEntry},
    rng::EngineRng,
    store::{Account, BankStore},
};

#[derive(Debug, Clone)]
pub struct PresetOutcome {
    pub entry: LedgerEntry,
    pub account: Account,
}

pub fn trigger_preset(
    store: &BankStore,
    rng: &mut EngineRng,
    account_id: &str,
    preset_id: &str,
) -> BankResult<PresetOutcome> {
    let mut account = store
        .get_account(account_id)?
        .ok_or_else(|| BankError::not_found("account", account_id))?;
    let preset = store
        .get_preset(preset_id)?
        .ok_or_else(|| BankError::not_found("preset", preset_id))?;

    let amount = preset.sample_amount(rng);

    let applied = match preset.direction {
        Direction::Expense => {
            let certified = account.balances.certified;
            if certified <= 0.0 || amount > certified {
                return Err(BankError::InsufficientFunds {
                    requested: amount,
                    available: certified,
                });
            }
            account.balances.apply_certified_expense(amount);
            amount
        }
        Direction::Income => {
            let margin =
                balance::recharge_margin(account.total_recharged, account.balances.certified);
            let capped = cap_income(amount, margin).ok_or_else(|| {
                BankError::RecoveryExhausted {
                    account_id: account_id.to_string(),
                }
            })?;
            account.balances.apply_certified_income(capped.applied);
            capped.applied
        }
    };

    account.balances.clamp_certified();

    let entry = factory::build_entry(
        account_id,
        &preset.description,
        preset.category,
        preset.direction,
        applied,
        true,
        true,
    );
    store.commit_mutation(account_id, &account.balances, &[&entry])?;

    log::debug!(
        "preset '{preset_id}' {} {:.2} on {account_id}",
        preset.direction.as_str(),
        applied
    );

    Ok(PresetOutcome { entry, account })
}
