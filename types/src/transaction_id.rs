//! Transaction identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::entity_id::AccountId;
use crate::error::HbarError;
use crate::time::ConsensusTimestamp;

/// Identifies a transaction by its payer and valid-start time, e.g.
/// `0.0.123456@1700000000.000000001`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransactionId {
    pub payer: AccountId,
    pub valid_start: ConsensusTimestamp,
}

impl TransactionId {
    pub fn new(payer: AccountId, valid_start: ConsensusTimestamp) -> Self {
        Self { payer, valid_start }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.payer, self.valid_start)
    }
}

impl FromStr for TransactionId {
    type Err = HbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HbarError::InvalidTransactionId(s.to_string());
        let (payer, start) = s.split_once('@').ok_or_else(invalid)?;
        Ok(Self {
            payer: payer.parse().map_err(|_| invalid())?,
            valid_start: start.parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let id = TransactionId::new(
            AccountId::from_num(123456),
            ConsensusTimestamp::new(1700000000, 1),
        );
        let text = id.to_string();
        assert_eq!(text, "0.0.123456@1700000000.000000001");
        assert_eq!(text.parse::<TransactionId>().unwrap(), id);
    }

    #[test]
    fn rejects_missing_separator() {
        assert!("0.0.1-1700000000.0".parse::<TransactionId>().is_err());
    }
}
