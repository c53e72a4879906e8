//! Receipt and precheck status codes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Status reported by the network for a submitted transaction.
///
/// Known codes get their own variant; anything else is kept verbatim so a
/// newer network can never make a receipt unreadable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    InsufficientPayerBalance,
    InvalidAccountId,
    InvalidTokenId,
    InvalidTopicId,
    TokenAlreadyAssociatedToAccount,
    TokenNotAssociatedToAccount,
    InsufficientTokenBalance,
    InvalidSignature,
    InvalidTransactionBody,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
            Self::InvalidAccountId => "INVALID_ACCOUNT_ID",
            Self::InvalidTokenId => "INVALID_TOKEN_ID",
            Self::InvalidTopicId => "INVALID_TOPIC_ID",
            Self::TokenAlreadyAssociatedToAccount => "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT",
            Self::TokenNotAssociatedToAccount => "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT",
            Self::InsufficientTokenBalance => "INSUFFICIENT_TOKEN_BALANCE",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidTransactionBody => "INVALID_TRANSACTION_BODY",
            Self::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "SUCCESS" => Self::Success,
            "INSUFFICIENT_PAYER_BALANCE" => Self::InsufficientPayerBalance,
            "INVALID_ACCOUNT_ID" => Self::InvalidAccountId,
            "INVALID_TOKEN_ID" => Self::InvalidTokenId,
            "INVALID_TOPIC_ID" => Self::InvalidTopicId,
            "TOKEN_ALREADY_ASSOCIATED_TO_ACCOUNT" => Self::TokenAlreadyAssociatedToAccount,
            "TOKEN_NOT_ASSOCIATED_TO_ACCOUNT" => Self::TokenNotAssociatedToAccount,
            "INSUFFICIENT_TOKEN_BALANCE" => Self::InsufficientTokenBalance,
            "INVALID_SIGNATURE" => Self::InvalidSignature,
            "INVALID_TRANSACTION_BODY" => Self::InvalidTransactionBody,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from_code(&code))
    }
}
