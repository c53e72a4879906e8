//! The network collaborator trait.

use async_trait::async_trait;

use hbar_types::{AccountId, ConsensusTimestamp, TopicId, TransactionId};

use crate::error::NetworkError;
use crate::operator::Operator;
use crate::response::{AccountBalance, AccountInfo, Receipt, TransactionResponse};
use crate::stream::TopicStream;
use crate::transaction::Transaction;

/// A ledger network as seen by the wallet.
///
/// Implementations own signing, encoding and transport. Every call is
/// attempted exactly once; implementations must not retry on the caller's
/// behalf.
#[async_trait]
pub trait LedgerNetwork: Send + Sync {
    /// Replace the operator identity used to sign and pay for transactions.
    /// `None` removes it.
    fn set_operator(&self, operator: Option<Operator>);

    /// Sign and send a transaction, returning once the network has
    /// acknowledged it and assigned a transaction id.
    async fn submit(&self, transaction: Transaction) -> Result<TransactionResponse, NetworkError>;

    /// Wait for the finality receipt of a submitted transaction.
    async fn receipt(&self, transaction_id: &TransactionId) -> Result<Receipt, NetworkError>;

    async fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo, NetworkError>;

    async fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance, NetworkError>;

    /// Open a message stream for `topic_id` starting at `start`.
    async fn subscribe_topic(
        &self,
        topic_id: &TopicId,
        start: ConsensusTimestamp,
    ) -> Result<TopicStream, NetworkError>;
}
