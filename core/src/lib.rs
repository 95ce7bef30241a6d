//! kontosim-core — the balance reconciliation engine behind a simulated
//! retail banking app.
//!
//! Each account carries three parallel balances: the display balance the
//! client renders, a tracked shadow of it, and the certified balance that
//! caps how much simulated income the account may ever receive. The rules
//! tying them together live in `balance`; the two transaction-generation
//! pipelines, the transfer coordinator and the referral trigger are built
//! on top of it and persist through the SQLite store.
//!
//! RULES:
//!   - Only the store module talks to the database.
//!   - All randomness flows through `EngineRng` — no platform RNG.
//!   - No operation leaves a partial balance update behind: a failed
//!     store write aborts the whole mutation.

pub mod balance;
pub mod engine;
pub mod error;
pub mod factory;
pub mod preset;
pub mod preset_trigger;
pub mod quick_random;
pub mod referral;
pub mod rng;
pub mod store;
pub mod transfer;
pub mod types;
