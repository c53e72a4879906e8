use hbar_types::{HbarError, Status};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no operator configured")]
    NoOperator,

    #[error("invalid operator: {0}")]
    InvalidOperator(String),

    #[error("transaction rejected at precheck: {0}")]
    Precheck(Status),

    #[error("query failed: {0}")]
    Query(Status),

    #[error("unknown transaction: {0}")]
    UnknownTransaction(String),

    #[error("gateway request failed: {0}")]
    Http(String),

    #[error("gateway error: {0}")]
    Gateway(String),

    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("topic stream error: {0}")]
    Stream(String),

    #[error(transparent)]
    Types(#[from] HbarError),
}
