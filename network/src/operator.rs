//! The operator identity: the account that pays for and signs transactions.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use hbar_types::{AccountId, KeyPair};

use crate::error::NetworkError;

/// Raw operator credentials as entered by the user.
///
/// Nothing is validated when an operator is set; the account id and key are
/// parsed when a transaction is signed, so a malformed key surfaces as a
/// failed submission.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Operator {
    account_id: String,
    private_key: String,
}

impl Operator {
    pub fn new(account_id: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            private_key: private_key.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Parse the operator account id.
    pub fn parse_account_id(&self) -> Result<AccountId, NetworkError> {
        self.account_id
            .parse()
            .map_err(|e| NetworkError::InvalidOperator(format!("{e}")))
    }

    /// Parse the operator signing key.
    pub fn keypair(&self) -> Result<KeyPair, NetworkError> {
        hbar_crypto::keypair_from_hex(&self.private_key)
            .map_err(|e| NetworkError::InvalidOperator(format!("{e}")))
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
