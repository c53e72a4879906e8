//! The ledger network collaborator.
//!
//! Everything the wallet needs from the network is behind the
//! [`LedgerNetwork`] trait:
//! - operator identity (who signs and pays)
//! - transaction submission and receipt lookup
//! - account info and balance queries
//! - topic message streams
//!
//! [`GatewayClient`] talks to a JSON-RPC/WebSocket gateway. Tests use the
//! in-memory ledger from `hbar-nullables`.

pub mod error;
pub mod gateway;
pub mod ledger;
pub mod operator;
pub mod response;
pub mod stream;
pub mod transaction;

pub use error::NetworkError;
pub use gateway::GatewayClient;
pub use ledger::LedgerNetwork;
pub use operator::Operator;
pub use response::{
    AccountBalance, AccountInfo, Receipt, TokenBalance, TopicMessage, TransactionResponse,
};
pub use stream::TopicStream;
pub use transaction::{HbarTransfer, SupplyType, TokenCreate, TokenTransfer, TokenType, Transaction};
