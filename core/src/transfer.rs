//! The transfer coordinator — server-authoritative P2P movement.
//!
//! Transfers are real-money movement: all three balances move on both
//! sides, and both ledger records are marked certified. The sender's
//! display balance is re-read from the store immediately before the
//! mutation — a caller-supplied balance is never trusted.

use crate::{
    error::{BankError, BankResult},
    factory::{self, Direction, LedgerEntry},
    preset::Category,
    store::{Account, BankStore},
};

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: LedgerEntry,
    pub to_entry: LedgerEntry,
}

pub fn transfer(
    store: &BankStore,
    from_id: &str,
    to_id: &str,
    amount: f64,
) -> BankResult<TransferOutcome> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(BankError::invalid_amount("transfer amount must be positive"));
    }
    if amount.fract() != 0.0 {
        return Err(BankError::invalid_amount(
            "transfer amount must be a whole number of currency units",
        ));
    }
    if from_id == to_id {
        return Err(BankError::SelfReferenceRejected {
            account_id: from_id.to_string(),
        });
    }

    let mut from_account = store
        .get_account(from_id)?
        .ok_or_else(|| BankError::not_found("account", from_id))?;
    let mut to_account = store
        .get_account(to_id)?
        .ok_or_else(|| BankError::not_found("account", to_id))?;

    if amount > from_account.balances.display {
        return Err(BankError::InsufficientFunds {
            requested: amount,
            available: from_account.balances.display,
        });
    }

    from_account.balances.apply_certified_expense(amount);
    to_account.balances.apply_certified_income(amount);

    let from_entry = factory::build_entry(
        from_id,
        &format!("Transfer to {}", to_account.display_name),
        Category::Transfer,
        Direction::Expense,
        amount,
        true,
        true,
    );
    let to_entry = factory::build_entry(
        to_id,
        &format!("Transfer from {}", from_account.display_name),
        Category::Transfer,
        Direction::Income,
        amount,
        true,
        true,
    );

    // Both balance updates and both appends land in one transaction.
    store.commit_transfer(
        from_id,
        &from_account.balances,
        &from_entry,
        to_id,
        &to_account.balances,
        &to_entry,
    )?;

    log::info!("transfer {amount:.2}: {from_id} -> {to_id}");

    Ok(TransferOutcome {
        from_account,
        to_account,
        from_entry,
        to_entry,
    })
}
