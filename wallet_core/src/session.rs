//! The active account and its signing key.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use hbar_network::Operator;

/// Credentials of the connected account, exactly as the user entered them.
///
/// Nothing is validated here. The key text is wiped from memory on drop and
/// never printed by `Debug`. The JSON form (`accountId`, `privateKey`) is
/// what the credential store persists.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub account_id: String,
    pub private_key: String,
}

impl Session {
    pub fn new(account_id: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            private_key: private_key.into(),
        }
    }

    /// The operator identity handed to the network.
    pub fn operator(&self) -> Operator {
        Operator::new(self.account_id.clone(), self.private_key.clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account_id", &self.account_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_key() {
        let session = Session::new("0.0.123456", "f".repeat(64));
        let text = format!("{session:?}");
        assert!(text.contains("0.0.123456"));
        assert!(!text.contains("ffff"));
    }

    #[test]
    fn json_uses_camel_case() {
        let session = Session::new("0.0.5", "ab");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json, serde_json::json!({ "accountId": "0.0.5", "privateKey": "ab" }));
    }

    #[test]
    fn operator_carries_account() {
        let session = Session::new("0.0.5", "ab");
        assert_eq!(session.operator().account_id(), "0.0.5");
    }
}
