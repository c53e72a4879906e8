//! Fundamental types for the hbar wallet.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: entity identifiers, HBAR and token amounts, receipt status
//! codes, transaction ids, consensus timestamps, network selection and key
//! material.

pub mod amount;
pub mod entity_id;
pub mod error;
pub mod keys;
pub mod network;
pub mod status;
pub mod time;
pub mod transaction_id;

pub use amount::{Hbar, TokenAmount, TOKEN_DECIMALS};
pub use entity_id::{AccountId, EntityId, TokenId, TopicId};
pub use error::HbarError;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use status::Status;
pub use time::ConsensusTimestamp;
pub use transaction_id::TransactionId;
