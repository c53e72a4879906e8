//! Responses, receipts and query results returned by the network.

use serde::{Deserialize, Serialize};

use hbar_types::{
    AccountId, ConsensusTimestamp, Hbar, PublicKey, Status, TokenAmount, TokenId, TopicId,
    TransactionId,
};

/// Acknowledgement of a submitted transaction. The id is assigned here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
}

/// Finality receipt for a transaction.
///
/// Only the fields relevant to the transaction kind are populated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<TokenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<TopicId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_sequence_number: Option<u64>,
}

impl Receipt {
    /// A receipt carrying only a status.
    pub fn with_status(status: Status) -> Self {
        Self {
            status,
            account_id: None,
            token_id: None,
            topic_id: None,
            topic_sequence_number: None,
        }
    }
}

/// Result of an account-info query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<PublicKey>,
    pub balance: Hbar,
    #[serde(default)]
    pub memo: String,
}

/// Result of an account-balance query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub hbars: Hbar,
    /// Associated tokens in the order the network reports them.
    #[serde(default)]
    pub tokens: Vec<TokenBalance>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token_id: TokenId,
    pub balance: TokenAmount,
}

/// A single consensus-ordered topic message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMessage {
    pub consensus_timestamp: ConsensusTimestamp,
    #[serde(with = "hex_bytes")]
    pub contents: Vec<u8>,
    pub sequence_number: u64,
    #[serde(with = "hex_bytes")]
    pub running_hash: Vec<u8>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hex::decode(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_omits_absent_fields() {
        let json = serde_json::to_value(Receipt::with_status(Status::Success)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "SUCCESS" }));
    }

    #[test]
    fn topic_message_bytes_are_hex() {
        let msg = TopicMessage {
            consensus_timestamp: ConsensusTimestamp::new(1, 2),
            contents: b"hi".to_vec(),
            sequence_number: 1,
            running_hash: vec![0xab, 0xcd],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["contents"], "6869");
        assert_eq!(json["running_hash"], "abcd");
        let back: TopicMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
