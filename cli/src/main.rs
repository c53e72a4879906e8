//! hbar-wallet: command-line wallet for Hedera-style ledger networks.

mod commands;
mod forms;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use hbar_types::NetworkId;
use hbar_utils::LogFormat;
use hbar_wallet_core::{CredentialStore, WalletConfig, WalletService};

use crate::commands::Output;

#[derive(Parser)]
#[command(name = "hbar-wallet", about = "Wallet for Hedera-style ledger networks")]
struct Cli {
    /// Network: "mainnet", "testnet", "previewnet" or "local".
    /// When a config file is provided, defaults to the file's network value.
    #[arg(long, env = "HBAR_NETWORK")]
    network: Option<NetworkId>,

    /// JSON-RPC endpoint of the ledger gateway.
    #[arg(long, env = "HBAR_GATEWAY_URL")]
    gateway_url: Option<String>,

    /// WebSocket endpoint for topic streams.
    #[arg(long, env = "HBAR_WS_URL")]
    ws_url: Option<String>,

    /// Directory holding the stored credentials.
    #[arg(long, env = "HBAR_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// How long `messages` listens for topic history, in milliseconds.
    #[arg(long, env = "HBAR_TOPIC_FETCH_WINDOW_MS")]
    topic_fetch_window_ms: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "HBAR_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "HBAR_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "HBAR_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect an account and remember it for later commands.
    Connect {
        /// Account id, e.g. 0.0.123456.
        #[arg(long, env = "HBAR_ACCOUNT_ID")]
        account_id: String,
        /// 64-character private key.
        #[arg(long, env = "HBAR_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
    /// Forget the connected account.
    Disconnect,
    /// Show balance and associated tokens of the connected account.
    Status,
    /// Send HBAR to another account.
    SendHbar { recipient: String, amount: String },
    /// Create a fungible token with the connected account as treasury.
    CreateToken {
        name: String,
        symbol: String,
        initial_supply: String,
    },
    /// Associate the connected account with a token.
    AssociateToken { token_id: String },
    /// Send whole token units to another account.
    SendToken {
        recipient: String,
        token_id: String,
        amount: String,
    },
    /// Create a message topic.
    CreateTopic {
        memo: String,
        /// Only the connected account may submit messages.
        #[arg(long)]
        private: bool,
    },
    /// Submit a message to a topic.
    SendMessage { topic_id: String, message: String },
    /// Fetch the messages of a topic.
    Messages {
        topic_id: String,
        /// Listening window in milliseconds (overrides the configured one).
        #[arg(long)]
        window_ms: Option<u64>,
    },
    /// Print topic messages as they arrive until Ctrl-C.
    Watch { topic_id: String },
}

/// File config, overridden by flags and environment.
fn resolve_config(cli: &Cli) -> anyhow::Result<WalletConfig> {
    let mut config = match &cli.config {
        Some(path) => WalletConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => WalletConfig::default(),
    };
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(url) = &cli.gateway_url {
        config.gateway_url = url.clone();
    }
    if let Some(url) = &cli.ws_url {
        config.ws_url = url.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(window) = cli.topic_fetch_window_ms {
        config.topic_fetch_window_ms = window;
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let log_format: LogFormat = config
        .log_format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    hbar_utils::init_logging(log_format, &config.log_level);
    tracing::debug!(
        network = %config.network,
        gateway = %config.gateway_url,
        "using {} network",
        config.network
    );

    let service = WalletService::from_config(&config)?;
    let store = CredentialStore::new(&config.data_dir);
    let out = Output { json: cli.json };

    if !matches!(cli.command, Command::Connect { .. }) && service.restore(&store)? {
        tracing::debug!("restored stored session");
    }

    match cli.command {
        Command::Connect {
            account_id,
            private_key,
        } => commands::connect(&service, &store, out, &account_id, &private_key).await,
        Command::Disconnect => commands::disconnect(&service, &store),
        Command::Status => commands::status(&service, out).await,
        Command::SendHbar { recipient, amount } => {
            commands::send_hbar(&service, out, &recipient, &amount).await
        }
        Command::CreateToken {
            name,
            symbol,
            initial_supply,
        } => commands::create_token(&service, out, &name, &symbol, &initial_supply).await,
        Command::AssociateToken { token_id } => {
            commands::associate_token(&service, out, &token_id).await
        }
        Command::SendToken {
            recipient,
            token_id,
            amount,
        } => commands::send_token(&service, out, &recipient, &token_id, &amount).await,
        Command::CreateTopic { memo, private } => {
            commands::create_topic(&service, out, &memo, private).await
        }
        Command::SendMessage { topic_id, message } => {
            commands::send_message(&service, out, &topic_id, &message).await
        }
        Command::Messages {
            topic_id,
            window_ms,
        } => {
            commands::messages(&service, out, &topic_id, window_ms.map(Duration::from_millis))
                .await
        }
        Command::Watch { topic_id } => commands::watch(&service, out, &topic_id).await,
    }
}
