//! Parse and conversion errors shared across crates.

use thiserror::Error;

/// Errors raised while turning caller-supplied text into ledger values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HbarError {
    #[error("invalid entity id: {0}")]
    InvalidEntityId(String),

    #[error("invalid HBAR amount: {0}")]
    InvalidHbar(String),

    #[error("invalid token amount: {0}")]
    InvalidTokenAmount(String),

    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid transaction id: {0}")]
    InvalidTransactionId(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("signature does not match: {0}")]
    SignatureMismatch(String),
}
