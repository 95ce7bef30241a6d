//! The quick-random generator — the home-screen "help" action.
//!
//! One invocation produces one simulated expense drawn uniformly from
//! the built-in expense catalog, minus the categories the account's
//! settings exclude. The expense touches display/tracked only: the
//! certified balance is NEVER moved by this path, and there is no cap
//! check — repeated invocations can push display arbitrarily far below
//! certified (but never below zero).

use crate::{
    error::{BankError, BankResult},
    factory::{self, LedgerEntry},
    preset::Category,
    rng::EngineRng,
    store::BankStore,
};

#[derive(Debug, Clone)]
pub struct QuickRandomOutcome {
    pub entry: LedgerEntry,
    pub new_display_balance: f64,
}

/// Apply one quick-random expense. Returns Ok(None) when every catalog
/// preset is excluded — not an error, the caller shows "nothing to do".
pub fn apply_quick_random_expense(
    store: &BankStore,
    rng: &mut EngineRng,
    account_id: &str,
    exclusions: &[Category],
) -> BankResult<Option<QuickRandomOutcome>> {
    let mut account = store
        .get_account(account_id)?
        .ok_or_else(|| BankError::not_found("account", account_id))?;

    let catalog = store.quick_random_presets()?;
    let eligible: Vec<_> = catalog
        .iter()
        .filter(|p| !exclusions.contains(&p.category))
        .collect();

    let Some(preset) = rng.pick(&eligible).copied() else {
        return Ok(None);
    };

    let amount = preset.sample_amount(rng);
    let entry = factory::quick_random_entry(
        account_id,
        &preset.description,
        preset.category,
        amount,
        rng,
    );

    account.balances.apply_simulated_expense(amount);
    store.commit_mutation(account_id, &account.balances, &[&entry])?;

    log::debug!(
        "quick-random: {} -{:.2} on {account_id}, display now {:.2}",
        preset.description,
        amount,
        account.balances.display
    );

    Ok(Some(QuickRandomOutcome {
        entry,
        new_display_balance: account.balances.display,
    }))
}
