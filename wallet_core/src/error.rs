use hbar_network::NetworkError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned (rather than reported inside a `TransactionResult`) by
/// the wallet.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("no credentials set")]
    NoCredentials,

    #[error("failed to get account info: {0}")]
    AccountInfo(String),

    #[error("failed to get topic messages: {0}")]
    TopicMessages(String),

    #[error("failed to subscribe to topic: {0}")]
    Subscribe(String),

    #[error("credential store error: {0}")]
    CredentialStore(String),

    #[error("network setup failed: {0}")]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
