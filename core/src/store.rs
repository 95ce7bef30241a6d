//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database. Generators, the transfer
//! coordinator and the referral trigger call store methods — they never
//! execute SQL directly.
//!
//! Mutations that pair a balance update with ledger appends go through
//! the atomic commit helpers at the bottom of this file: either the
//! whole mutation lands or none of it does.

use crate::{
    balance::BalanceTriple,
    error::BankResult,
    factory::LedgerEntry,
    referral::ReferralActivation,
};
use rusqlite::Connection;

mod account;
mod ledger;
mod preset;
mod referral;
mod settings;

pub use account::Account;

pub struct BankStore {
    conn: Connection,
}

impl BankStore {
    pub fn open(path: &str) -> BankResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> BankResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order, then make sure the
    /// built-in preset catalog is present.
    pub fn migrate(&self) -> BankResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_accounts.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_presets.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/003_referrals.sql"))?;
        self.seed_builtin_presets()?;
        Ok(())
    }

    // ── Atomic commits ─────────────────────────────────────────

    /// Persist one account's balances together with the ledger entries
    /// the mutation produced. Single SQL transaction.
    pub fn commit_mutation(
        &self,
        account_id: &str,
        balances: &BalanceTriple,
        entries: &[&LedgerEntry],
    ) -> BankResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        account::exec_save_balances(&tx, account_id, balances)?;
        for entry in entries {
            ledger::exec_append(&tx, entry)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Persist a cross-account transfer: both balance updates and both
    /// ledger appends in one transaction, so a crash between the sender
    /// debit and the receiver credit cannot strand value.
    #[allow(clippy::too_many_arguments)]
    pub fn commit_transfer(
        &self,
        from_id: &str,
        from_balances: &BalanceTriple,
        from_entry: &LedgerEntry,
        to_id: &str,
        to_balances: &BalanceTriple,
        to_entry: &LedgerEntry,
    ) -> BankResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        account::exec_save_balances(&tx, from_id, from_balances)?;
        account::exec_save_balances(&tx, to_id, to_balances)?;
        ledger::exec_append(&tx, from_entry)?;
        ledger::exec_append(&tx, to_entry)?;
        tx.commit()?;
        Ok(())
    }

    /// Persist an admin top-up: balances, the new lifetime recharge
    /// total and the top-up ledger entry in one transaction.
    pub fn commit_top_up(
        &self,
        account_id: &str,
        balances: &BalanceTriple,
        total_recharged: f64,
        entry: &LedgerEntry,
    ) -> BankResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        account::exec_save_balances(&tx, account_id, balances)?;
        account::exec_set_total_recharged(&tx, account_id, total_recharged)?;
        ledger::exec_append(&tx, entry)?;
        tx.commit()?;
        Ok(())
    }

    /// Persist a threshold-crossing top-up together with its referral
    /// bonus: the referred account's top-up, the referrer credit, the
    /// bonus ledger entry, the one-shot activation record and the
    /// referred account's flag flip. One transaction, so a failure
    /// anywhere leaves neither the top-up nor the bonus behind.
    #[allow(clippy::too_many_arguments)]
    pub fn commit_top_up_with_bonus(
        &self,
        account_id: &str,
        balances: &BalanceTriple,
        total_recharged: f64,
        entry: &LedgerEntry,
        referrer_balances: &BalanceTriple,
        bonus_entry: &LedgerEntry,
        activation: &ReferralActivation,
    ) -> BankResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        account::exec_save_balances(&tx, account_id, balances)?;
        account::exec_set_total_recharged(&tx, account_id, total_recharged)?;
        ledger::exec_append(&tx, entry)?;
        account::exec_save_balances(&tx, &activation.referrer_id, referrer_balances)?;
        ledger::exec_append(&tx, bonus_entry)?;
        referral::exec_insert_activation(&tx, activation)?;
        account::exec_set_referral_activated(&tx, &activation.referred_id)?;
        tx.commit()?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
