//! Wallet configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use hbar_types::NetworkId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("config is not serializable: {0}")]
    Serialize(String),
}

/// Configuration for the wallet.
///
/// Can be loaded from a TOML file via [`WalletConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so
/// an empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Which network the wallet talks to.
    #[serde(default)]
    pub network: NetworkId,

    /// JSON-RPC endpoint of the ledger gateway.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// WebSocket endpoint for topic streams.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Directory holding the persisted credentials.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// How long a topic history fetch listens before returning.
    #[serde(default = "default_topic_fetch_window_ms")]
    pub topic_fetch_window_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_gateway_url() -> String {
    "http://127.0.0.1:5600/rpc".to_string()
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:5600/ws".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./hbar_wallet_data")
}

fn default_topic_fetch_window_ms() -> u64 {
    2_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn topic_fetch_window(&self) -> Duration {
        Duration::from_millis(self.topic_fetch_window_ms)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: NetworkId::default(),
            gateway_url: default_gateway_url(),
            ws_url: default_ws_url(),
            data_dir: default_data_dir(),
            topic_fetch_window_ms: default_topic_fetch_window_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
