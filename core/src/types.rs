//! Shared primitive types used across the engine.

/// A stable, unique identifier for an account.
pub type AccountId = String;

/// A stable, unique identifier for a ledger entry.
pub type EntryId = String;

/// A stable, unique identifier for a preset.
pub type PresetId = String;
