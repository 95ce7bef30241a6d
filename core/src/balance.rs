//! The balance calculator — pure rules tying the three balances together.
//!
//! RULE: nothing in this module performs I/O. Callers read an account,
//! run these functions, and persist the result through the store.
//!
//! Two distinct recovery margins exist and must not be conflated:
//!   - display margin:  max(0, certified - display)          (§ manual income)
//!   - recharge margin: max(0, total_recharged - certified)  (§ preset income)

use serde::{Deserialize, Serialize};

/// The three parallel balance fields of one account.
///
/// `display` and `tracked` are a deliberate shadow pair in the stored
/// model; every mutation here moves them together so they cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceTriple {
    pub display: f64,
    pub tracked: f64,
    pub certified: f64,
}

impl BalanceTriple {
    pub const ZERO: BalanceTriple = BalanceTriple {
        display: 0.0,
        tracked: 0.0,
        certified: 0.0,
    };

    pub fn new(display: f64, tracked: f64, certified: f64) -> Self {
        Self {
            display,
            tracked,
            certified,
        }
    }

    /// Simulated expense: display/tracked drop, floored at zero.
    /// Certified is untouched — this is the quick-random semantics.
    pub fn apply_simulated_expense(&mut self, amount: f64) {
        let amount = amount.abs();
        self.display = (self.display - amount).max(0.0);
        self.tracked = (self.tracked - amount).max(0.0);
    }

    /// Simulated income: display/tracked rise. The caller is responsible
    /// for having capped `applied` against a recovery margin first.
    pub fn apply_simulated_income(&mut self, applied: f64) {
        self.display += applied;
        self.tracked += applied;
    }

    /// Certified expense: all three balances drop, each floored at zero.
    /// This is the preset-trigger / transfer-sender semantics.
    pub fn apply_certified_expense(&mut self, amount: f64) {
        let amount = amount.abs();
        self.display = (self.display - amount).max(0.0);
        self.tracked = (self.tracked - amount).max(0.0);
        self.certified = (self.certified - amount).max(0.0);
    }

    /// Certified income: all three balances rise.
    pub fn apply_certified_income(&mut self, amount: f64) {
        self.display += amount;
        self.tracked += amount;
        self.certified += amount;
    }

    /// Room left for simulated income before display outruns certified.
    pub fn display_margin(&self) -> f64 {
        (self.certified - self.display).max(0.0)
    }

    /// Clamp transient negative certified values before persistence.
    /// Invariant: certified >= 0 at rest.
    pub fn clamp_certified(&mut self) {
        if self.certified < 0.0 {
            self.certified = 0.0;
        }
    }
}

/// How much of the account's lifetime real top-ups has not yet been
/// replayed as certified income. Bounds preset-trigger income.
pub fn recharge_margin(total_recharged: f64, certified: f64) -> f64 {
    (total_recharged - certified).max(0.0)
}

/// Outcome of capping a requested income against a margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CappedIncome {
    pub applied: f64,
    pub was_capped: bool,
}

/// Cap a requested income amount against a margin. Returns None when the
/// margin is already exhausted — the request must be rejected outright,
/// no transaction created.
pub fn cap_income(requested: f64, margin: f64) -> Option<CappedIncome> {
    if margin <= 0.0 {
        return None;
    }
    let applied = requested.min(margin);
    Some(CappedIncome {
        applied,
        was_capped: requested > margin,
    })
}

/// Simulated flows carry whole currency units only.
pub fn floor_amount(amount: f64) -> f64 {
    amount.floor()
}

/// Normalize to the fixed two-decimal form used at the persistence
/// boundary.
pub fn normalize_amount(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
