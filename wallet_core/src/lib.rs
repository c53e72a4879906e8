//! Wallet core library for the hbar wallet.
//!
//! Provides everything a wallet front-end needs:
//! - The active session and its persistence across runs
//! - One facade call per ledger operation ([`WalletService`])
//! - Uniform transaction results, account snapshots, topic records
//! - Bounded topic history fetches and cancellable live subscriptions
//! - TOML configuration

pub mod config;
pub mod credentials;
pub mod error;
pub mod result;
pub mod service;
pub mod session;
pub mod subscription;

pub use config::{ConfigError, WalletConfig};
pub use credentials::{CredentialStore, CREDENTIALS_FILE};
pub use error::WalletError;
pub use result::{AccountSnapshot, Operation, TokenBalance, TopicMessageRecord, TransactionResult};
pub use service::{WalletService, DEFAULT_TOPIC_FETCH_WINDOW};
pub use session::Session;
pub use subscription::SubscriptionHandle;
