//! The transaction factory — builds canonical ledger records.
//!
//! The factory never persists anything. It returns a `LedgerEntry` for
//! the caller to commit atomically with the balance update it implies.

use crate::{
    balance::normalize_amount,
    preset::Category,
    rng::EngineRng,
    types::{AccountId, EntryId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Share of quick-random expenses that show as already posted; the rest
/// render as pending. Cosmetic only, no effect on balances.
pub const POSTED_PROBABILITY: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Expense,
    Income,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }
}

/// One immutable ledger record. `amount` is always positive; the sign
/// is implied by `direction`. Post-creation edits to `amount` and
/// `description` are cosmetic and never re-touch balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub account_id: AccountId,
    pub description: String,
    pub category: Category,
    pub direction: Direction,
    pub amount: f64,
    /// True when this entry moved the certified balance.
    pub is_certified: bool,
    /// Cosmetic pending-vs-settled flag.
    pub is_posted: bool,
    pub occurred_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// The fixed two-decimal string form used at the persistence
    /// boundary and in client payloads.
    pub fn amount_string(&self) -> String {
        format!("{:.2}", self.amount)
    }

    /// The signed delta this entry applies to a balance.
    pub fn signed_delta(&self) -> f64 {
        match self.direction {
            Direction::Expense => -self.amount,
            Direction::Income => self.amount,
        }
    }
}

/// Build a ledger record with a fresh id and normalized amount.
pub fn build_entry(
    account_id: &str,
    description: &str,
    category: Category,
    direction: Direction,
    amount: f64,
    is_certified: bool,
    is_posted: bool,
) -> LedgerEntry {
    LedgerEntry {
        entry_id: Uuid::new_v4().to_string(),
        account_id: account_id.to_string(),
        description: description.to_string(),
        category,
        direction,
        amount: normalize_amount(amount.abs()),
        is_certified,
        is_posted,
        occurred_at: Utc::now(),
    }
}

/// Build the record for a quick-random expense: never certified, with a
/// randomized posted flag to emulate pending-transaction noise.
pub fn quick_random_entry(
    account_id: &str,
    description: &str,
    category: Category,
    amount: f64,
    rng: &mut EngineRng,
) -> LedgerEntry {
    let is_posted = rng.chance(POSTED_PROBABILITY);
    build_entry(
        account_id,
        description,
        category,
        Direction::Expense,
        amount,
        false,
        is_posted,
    )
}
