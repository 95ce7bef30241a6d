//! The engine facade — the operation surface the route layer calls.
//!
//! The engine owns the store connection and the seeded RNG, so every
//! per-account read-modify-write cycle is serialized by construction:
//! there is exactly one writer. Store and settings are injected here,
//! never reached through globals.

use crate::{
    balance::{cap_income, BalanceTriple},
    error::{BankError, BankResult},
    factory::{self, Direction, LedgerEntry},
    preset::{Category, Preset},
    preset_trigger::{self, PresetOutcome},
    quick_random::{self, QuickRandomOutcome},
    referral::{self, TopUpOutcome},
    rng::EngineRng,
    store::{Account, BankStore},
    transfer::{self, TransferOutcome},
    types::AccountId,
};
use chrono::Utc;

pub struct BankEngine {
    store: BankStore,
    rng: EngineRng,
}

#[derive(Debug, Clone)]
pub struct ManualOutcome {
    pub entry: LedgerEntry,
    pub new_balance: f64,
    pub was_capped: bool,
}

impl BankEngine {
    /// Wire an engine around an already-opened store. Migrations are
    /// the caller's responsibility (see `open` / `in_memory`).
    pub fn new(store: BankStore, seed: u64) -> Self {
        Self {
            store,
            rng: EngineRng::new(seed),
        }
    }

    pub fn open(path: &str, seed: u64) -> BankResult<Self> {
        let store = BankStore::open(path)?;
        store.migrate()?;
        Ok(Self::new(store, seed))
    }

    /// In-memory engine for tests and demos.
    pub fn in_memory(seed: u64) -> BankResult<Self> {
        let store = BankStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(store, seed))
    }

    pub fn store(&self) -> &BankStore {
        &self.store
    }

    // ── Accounts ───────────────────────────────────────────────

    pub fn create_account(
        &self,
        account_id: impl Into<AccountId>,
        display_name: impl Into<String>,
        referred_by: Option<AccountId>,
    ) -> BankResult<Account> {
        let account = Account {
            account_id: account_id.into(),
            display_name: display_name.into(),
            balances: BalanceTriple::ZERO,
            total_recharged: 0.0,
            referred_by,
            referral_activated: false,
            created_at: Utc::now(),
        };
        self.store.insert_account(&account)?;
        Ok(account)
    }

    pub fn get_account(&self, account_id: &str) -> BankResult<Account> {
        self.store
            .get_account(account_id)?
            .ok_or_else(|| BankError::not_found("account", account_id))
    }

    pub fn list_transactions(&self, account_id: &str) -> BankResult<Vec<LedgerEntry>> {
        self.store.list_transactions(account_id)
    }

    // ── Generation pipelines ───────────────────────────────────

    /// One simulated expense from the built-in catalog. None when every
    /// preset is excluded. Touches display/tracked only.
    pub fn apply_quick_random_expense(
        &mut self,
        account_id: &str,
        exclusions: &[Category],
    ) -> BankResult<Option<QuickRandomOutcome>> {
        quick_random::apply_quick_random_expense(&self.store, &mut self.rng, account_id, exclusions)
    }

    /// Fire a named preset; expense or income, touches all three
    /// balances including certified.
    pub fn trigger_preset(
        &mut self,
        account_id: &str,
        preset_id: &str,
    ) -> BankResult<PresetOutcome> {
        preset_trigger::trigger_preset(&self.store, &mut self.rng, account_id, preset_id)
    }

    /// Register a custom preset for later triggering.
    pub fn define_preset(&self, preset: Preset) -> BankResult<Preset> {
        self.store.upsert_preset(&preset)?;
        Ok(preset)
    }

    /// A user-entered simulated transaction. Expenses behave like the
    /// quick-random path (display/tracked only); income is capped by
    /// the display margin max(0, certified - display).
    pub fn record_manual_transaction(
        &mut self,
        account_id: &str,
        description: &str,
        amount: f64,
        direction: Direction,
        category: Category,
    ) -> BankResult<ManualOutcome> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(BankError::invalid_amount("amount must be positive"));
        }
        if amount.fract() != 0.0 {
            return Err(BankError::invalid_amount(
                "amount must be a whole number of currency units",
            ));
        }

        let mut account = self.get_account(account_id)?;

        let (applied, was_capped) = match direction {
            Direction::Expense => {
                account.balances.apply_simulated_expense(amount);
                (amount, false)
            }
            Direction::Income => {
                let margin = account.balances.display_margin();
                let capped = cap_income(amount, margin).ok_or_else(|| {
                    BankError::RecoveryExhausted {
                        account_id: account_id.to_string(),
                    }
                })?;
                account.balances.apply_simulated_income(capped.applied);
                (capped.applied, capped.was_capped)
            }
        };

        let entry = factory::build_entry(
            account_id,
            description,
            category,
            direction,
            applied,
            false,
            true,
        );
        self.store
            .commit_mutation(account_id, &account.balances, &[&entry])?;

        Ok(ManualOutcome {
            entry,
            new_balance: account.balances.display,
            was_capped,
        })
    }

    // ── Transfers and top-ups ──────────────────────────────────

    pub fn transfer(
        &mut self,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> BankResult<TransferOutcome> {
        transfer::transfer(&self.store, from_id, to_id, amount)
    }

    pub fn top_up(&mut self, account_id: &str, amount: f64) -> BankResult<TopUpOutcome> {
        referral::top_up(&self.store, account_id, amount)
    }

    // ── Ledger edits ───────────────────────────────────────────

    /// Cosmetic history edit: rewrites amount and/or description of an
    /// existing entry. Deliberately never re-touches any balance.
    pub fn edit_ledger_entry(
        &self,
        entry_id: &str,
        new_amount: Option<f64>,
        new_description: Option<&str>,
    ) -> BankResult<LedgerEntry> {
        if let Some(a) = new_amount {
            if !a.is_finite() || a <= 0.0 {
                return Err(BankError::invalid_amount("edited amount must be positive"));
            }
        }
        self.store
            .update_transaction_cosmetic(entry_id, new_amount, new_description)?;
        self.store
            .get_transaction(entry_id)?
            .ok_or_else(|| BankError::not_found("ledger entry", entry_id))
    }
}
