use thiserror::Error;

/// Every failure the engine can report. All variants are recoverable at
/// the request level: the caller gets a structured rejection and no
/// partial state change was persisted.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Insufficient funds: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("Recovery margin exhausted for account '{account_id}'")]
    RecoveryExhausted { account_id: String },

    #[error("Self-transfer rejected for account '{account_id}'")]
    SelfReferenceRejected { account_id: String },

    /// Reserved for the auth/admin layer that wraps this core.
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BankError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_amount(reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            reason: reason.into(),
        }
    }
}

pub type BankResult<T> = Result<T, BankError>;
