//! Records handed back to the wallet's callers.

use serde::Serialize;
use std::fmt;

use hbar_network::{AccountBalance, AccountInfo, Receipt, TopicMessage};
use hbar_types::{AccountId, Status, TokenId, TopicId, TransactionId};

/// The mutating wallet operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    SendHbar,
    CreateToken,
    AssociateToken,
    SendToken,
    CreateTopic,
    SendMessage,
}

impl Operation {
    /// Short name used in logs and spans.
    pub fn name(self) -> &'static str {
        match self {
            Self::SendHbar => "send_hbar",
            Self::CreateToken => "create_token",
            Self::AssociateToken => "associate_token",
            Self::SendToken => "send_token",
            Self::CreateTopic => "create_topic",
            Self::SendMessage => "send_message",
        }
    }

    /// Prefix of every error message reported for this operation.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Self::SendHbar => "Failed to send HBAR",
            Self::CreateToken => "Failed to create token",
            Self::AssociateToken => "Failed to associate token",
            Self::SendToken => "Failed to send token",
            Self::CreateTopic => "Failed to create topic",
            Self::SendMessage => "Failed to send message",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one mutating operation.
///
/// `success` is true exactly when the receipt status is `SUCCESS`. The
/// created token id, topic id and message sequence number are only ever set
/// by the operation that produces them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_id: Option<TransactionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt_status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_id: Option<TokenId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic_id: Option<TopicId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence_number: Option<u64>,
}

impl TransactionResult {
    /// A failure that happened before a receipt was available.
    pub fn failure(operation: Operation, cause: impl fmt::Display) -> Self {
        Self {
            success: false,
            transaction_id: None,
            receipt_status: None,
            error: Some(format!("{}: {cause}", operation.failure_prefix())),
            token_id: None,
            topic_id: None,
            sequence_number: None,
        }
    }

    /// Map a settled receipt into a result for `operation`.
    pub fn from_receipt(operation: Operation, transaction_id: TransactionId, receipt: Receipt) -> Self {
        let success = receipt.status.is_success();
        let error = (!success).then(|| {
            format!(
                "{}: receipt status {}",
                operation.failure_prefix(),
                receipt.status
            )
        });
        Self {
            success,
            transaction_id: Some(transaction_id),
            receipt_status: Some(receipt.status),
            error,
            token_id: receipt
                .token_id
                .filter(|_| operation == Operation::CreateToken),
            topic_id: receipt
                .topic_id
                .filter(|_| operation == Operation::CreateTopic),
            sequence_number: receipt
                .topic_sequence_number
                .filter(|_| operation == Operation::SendMessage),
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.transaction_id.as_ref()
    }

    pub fn receipt_status(&self) -> Option<&Status> {
        self.receipt_status.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn token_id(&self) -> Option<TokenId> {
        self.token_id
    }

    pub fn topic_id(&self) -> Option<TopicId> {
        self.topic_id
    }

    pub fn sequence_number(&self) -> Option<u64> {
        self.sequence_number
    }
}

/// Point-in-time view of the connected account. Never cached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account_id: AccountId,
    /// HBAR balance as the ledger renders it, e.g. `"10 ℏ"`.
    pub balance: String,
    /// Associated tokens in the order the network reports them.
    pub tokens: Vec<TokenBalance>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub token_id: TokenId,
    /// Raw balance in smallest units.
    pub balance: String,
}

impl AccountSnapshot {
    pub fn from_queries(info: AccountInfo, balance: AccountBalance) -> Self {
        Self {
            account_id: info.account_id,
            balance: info.balance.to_string(),
            tokens: balance
                .tokens
                .into_iter()
                .map(|token| TokenBalance {
                    token_id: token.token_id,
                    balance: token.balance.raw().to_string(),
                })
                .collect(),
        }
    }
}

/// One topic message as shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessageRecord {
    pub consensus_timestamp: String,
    pub message: String,
    pub sequence_number: u64,
    /// Lowercase hex.
    pub running_hash: String,
}

impl From<TopicMessage> for TopicMessageRecord {
    fn from(message: TopicMessage) -> Self {
        Self {
            consensus_timestamp: message.consensus_timestamp.to_string(),
            message: String::from_utf8_lossy(&message.contents).into_owned(),
            sequence_number: message.sequence_number,
            running_hash: hex::encode(&message.running_hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbar_types::{ConsensusTimestamp, Hbar, TokenAmount};

    fn tx_id() -> TransactionId {
        "0.0.123456@1700000000.000000001".parse().unwrap()
    }

    #[test]
    fn success_receipt_maps_to_success() {
        let result = TransactionResult::from_receipt(
            Operation::SendHbar,
            tx_id(),
            Receipt::with_status(Status::Success),
        );
        assert!(result.success());
        assert_eq!(result.error(), None);
        assert_eq!(result.receipt_status(), Some(&Status::Success));
    }

    #[test]
    fn failed_receipt_keeps_id_and_status() {
        let result = TransactionResult::from_receipt(
            Operation::SendHbar,
            tx_id(),
            Receipt::with_status(Status::InsufficientPayerBalance),
        );
        assert!(!result.success());
        assert_eq!(result.transaction_id(), Some(&tx_id()));
        assert_eq!(
            result.error(),
            Some("Failed to send HBAR: receipt status INSUFFICIENT_PAYER_BALANCE")
        );
    }

    #[test]
    fn created_ids_only_for_their_operation() {
        let receipt = Receipt {
            token_id: Some(TokenId::from_num(7)),
            topic_id: Some(TopicId::from_num(8)),
            topic_sequence_number: Some(9),
            ..Receipt::with_status(Status::Success)
        };
        let token = TransactionResult::from_receipt(Operation::CreateToken, tx_id(), receipt.clone());
        assert_eq!(token.token_id(), Some(TokenId::from_num(7)));
        assert_eq!(token.topic_id(), None);
        assert_eq!(token.sequence_number(), None);

        let topic = TransactionResult::from_receipt(Operation::CreateTopic, tx_id(), receipt.clone());
        assert_eq!(topic.token_id(), None);
        assert_eq!(topic.topic_id(), Some(TopicId::from_num(8)));

        let send = TransactionResult::from_receipt(Operation::SendHbar, tx_id(), receipt);
        assert_eq!(send.token_id(), None);
        assert_eq!(send.topic_id(), None);
        assert_eq!(send.sequence_number(), None);
    }

    #[test]
    fn json_field_names() {
        let result = TransactionResult::from_receipt(
            Operation::SendMessage,
            tx_id(),
            Receipt {
                topic_sequence_number: Some(3),
                ..Receipt::with_status(Status::Success)
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "transactionId": "0.0.123456@1700000000.000000001",
                "receiptStatus": "SUCCESS",
                "sequenceNumber": 3,
            })
        );
    }

    #[test]
    fn failure_json_has_only_error() {
        let result = TransactionResult::failure(Operation::CreateTopic, "network unreachable");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "Failed to create topic: network unreachable",
            })
        );
    }

    #[test]
    fn snapshot_renders_balances() {
        let snapshot = AccountSnapshot::from_queries(
            AccountInfo {
                account_id: AccountId::from_num(5),
                key: None,
                balance: Hbar::from_hbars(10).unwrap(),
                memo: String::new(),
            },
            AccountBalance {
                account_id: AccountId::from_num(5),
                hbars: Hbar::from_hbars(10).unwrap(),
                tokens: vec![hbar_network::TokenBalance {
                    token_id: TokenId::from_num(9),
                    balance: TokenAmount::new(500),
                }],
            },
        );
        assert_eq!(snapshot.balance, "10 ℏ");
        assert_eq!(snapshot.tokens[0].balance, "500");
    }

    #[test]
    fn message_record_from_network_message() {
        let record = TopicMessageRecord::from(TopicMessage {
            consensus_timestamp: ConsensusTimestamp::new(12, 5),
            contents: b"hello".to_vec(),
            sequence_number: 1,
            running_hash: vec![0xde, 0xad],
        });
        assert_eq!(record.consensus_timestamp, "12.000000005");
        assert_eq!(record.message, "hello");
        assert_eq!(record.running_hash, "dead");
    }
}
