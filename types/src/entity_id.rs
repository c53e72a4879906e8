//! `shard.realm.num` entity identifiers.
//!
//! Accounts, tokens and topics share the same textual form, e.g. `0.0.123456`.
//! Each kind gets its own newtype so a token id can never be passed where an
//! account id is expected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::HbarError;

/// The raw `shard.realm.num` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl FromStr for EntityId {
    type Err = HbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HbarError::InvalidEntityId(s.to_string());
        let mut parts = s.split('.');
        let mut next = || -> Result<u64, HbarError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        };
        let shard = next()?;
        let realm = next()?;
        let num = next()?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { shard, realm, num })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

macro_rules! entity_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub EntityId);

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityId::new(shard, realm, num))
            }

            /// Shorthand for an id in shard 0, realm 0.
            pub const fn from_num(num: u64) -> Self {
                Self::new(0, 0, num)
            }

            pub fn num(&self) -> u64 {
                self.0.num
            }
        }

        impl FromStr for $name {
            type Err = HbarError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                EntityId::from_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

entity_newtype!(
    /// A ledger account, e.g. `0.0.123456`.
    AccountId
);
entity_newtype!(
    /// A fungible token created on the ledger.
    TokenId
);
entity_newtype!(
    /// A consensus message topic.
    TopicId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_triple() {
        let id: AccountId = "0.0.123456".parse().unwrap();
        assert_eq!(id, AccountId::from_num(123456));
        assert_eq!(id.to_string(), "0.0.123456");
    }

    #[test]
    fn parses_non_zero_shard_and_realm() {
        let id: TokenId = "1.2.3".parse().unwrap();
        assert_eq!(id.0, EntityId::new(1, 2, 3));
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "invalid", "0.0", "0.0.1.2", "0..1", "0.0.-1", "0.0.+1", " 0.0.1", "0.0.x"] {
            assert!(bad.parse::<AccountId>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn serializes_as_string() {
        let id = TopicId::from_num(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0.0.42\"");
        let back: TopicId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_bad_text() {
        assert!(serde_json::from_str::<AccountId>("\"abc\"").is_err());
    }
}
