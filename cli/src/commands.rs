//! One handler per form. Each validates its input, calls the wallet and
//! prints the outcome.

use anyhow::{bail, Context};
use std::time::Duration;

use hbar_wallet_core::{
    AccountSnapshot, CredentialStore, Session, TopicMessageRecord, TransactionResult,
    WalletService,
};

use crate::forms;

/// Shown when a connect attempt cannot load the account.
pub const CONNECT_FAILED: &str = "Invalid credentials or network error";

/// Where results go: human lines or JSON documents on stdout.
#[derive(Clone, Copy, Debug)]
pub struct Output {
    pub json: bool,
}

impl Output {
    /// Print a transaction outcome. A failed transaction becomes an error
    /// carrying the wallet's message verbatim.
    pub fn transaction(&self, result: &TransactionResult, success_line: &str) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else if result.success() {
            for line in describe_success(result, success_line) {
                println!("{line}");
            }
        }
        if !result.success() {
            bail!("{}", result.error().unwrap_or("transaction failed"));
        }
        Ok(())
    }

    pub fn account(&self, snapshot: &AccountSnapshot) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
            return Ok(());
        }
        println!("Account: {}", snapshot.account_id);
        println!("Balance: {}", snapshot.balance);
        if snapshot.tokens.is_empty() {
            println!("Tokens:  none");
        }
        for token in &snapshot.tokens {
            println!("Token {}: {}", token.token_id, token.balance);
        }
        Ok(())
    }

    pub fn message(&self, record: &TopicMessageRecord) {
        if self.json {
            // Single-line JSON so a watch stream stays one record per line.
            match serde_json::to_string(record) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("failed to encode message: {e}"),
            }
        } else {
            println!("{}", describe_message(record));
        }
    }
}

/// Success line plus any created id or sequence number.
pub fn describe_success(result: &TransactionResult, success_line: &str) -> Vec<String> {
    let mut lines = vec![success_line.to_string()];
    if let Some(id) = result.transaction_id() {
        lines.push(format!("Transaction ID: {id}"));
    }
    if let Some(token_id) = result.token_id() {
        lines.push(format!("Token ID: {token_id}"));
    }
    if let Some(topic_id) = result.topic_id() {
        lines.push(format!("Topic ID: {topic_id}"));
    }
    if let Some(sequence) = result.sequence_number() {
        lines.push(format!("Sequence number: {sequence}"));
    }
    lines
}

pub fn describe_message(record: &TopicMessageRecord) -> String {
    format!(
        "#{} [{}] {}",
        record.sequence_number, record.consensus_timestamp, record.message
    )
}

// ── Handlers ───────────────────────────────────────────────────────────

pub async fn connect(
    service: &WalletService,
    store: &CredentialStore,
    out: Output,
    account_id: &str,
    private_key: &str,
) -> anyhow::Result<()> {
    forms::validate_connect(account_id, private_key)?;
    let snapshot = service
        .connect(Session::new(account_id, private_key), store)
        .await
        .map_err(|e| {
            tracing::warn!(account = %account_id, "connection failed: {e}");
            anyhow::anyhow!(CONNECT_FAILED)
        })?;
    if !out.json {
        println!("Wallet connected successfully!");
    }
    out.account(&snapshot)
}

pub fn disconnect(service: &WalletService, store: &CredentialStore) -> anyhow::Result<()> {
    service.disconnect(store)?;
    println!("Wallet disconnected successfully");
    Ok(())
}

pub async fn status(service: &WalletService, out: Output) -> anyhow::Result<()> {
    let snapshot = service.get_account_info().await?;
    out.account(&snapshot)
}

pub async fn send_hbar(
    service: &WalletService,
    out: Output,
    recipient: &str,
    amount: &str,
) -> anyhow::Result<()> {
    forms::require_all(&[recipient, amount])?;
    let result = service.send_hbar(recipient, amount).await?;
    out.transaction(&result, &format!("Successfully sent {amount} HBAR to {recipient}"))
}

pub async fn create_token(
    service: &WalletService,
    out: Output,
    name: &str,
    symbol: &str,
    initial_supply: &str,
) -> anyhow::Result<()> {
    forms::require_all(&[name, symbol, initial_supply])?;
    let result = service.create_token(name, symbol, initial_supply).await?;
    out.transaction(&result, &format!("Token {symbol} created successfully!"))
}

pub async fn associate_token(
    service: &WalletService,
    out: Output,
    token_id: &str,
) -> anyhow::Result<()> {
    forms::validate_token_id(token_id)?;
    let result = service.associate_token(token_id).await?;
    out.transaction(&result, &format!("Token {token_id} associated successfully!"))
}

pub async fn send_token(
    service: &WalletService,
    out: Output,
    recipient: &str,
    token_id: &str,
    amount: &str,
) -> anyhow::Result<()> {
    forms::require_all(&[recipient, token_id, amount])?;
    let result = service.send_token(recipient, token_id, amount).await?;
    out.transaction(
        &result,
        &format!("Successfully sent {amount} tokens to {recipient}"),
    )
}

pub async fn create_topic(
    service: &WalletService,
    out: Output,
    memo: &str,
    is_private: bool,
) -> anyhow::Result<()> {
    forms::validate_topic_memo(memo)?;
    let result = service.create_topic(memo, is_private).await?;
    out.transaction(&result, "Topic created successfully!")
}

pub async fn send_message(
    service: &WalletService,
    out: Output,
    topic_id: &str,
    message: &str,
) -> anyhow::Result<()> {
    forms::require_all(&[topic_id, message])?;
    let result = service.send_message(topic_id, message).await?;
    out.transaction(&result, "Message sent successfully!")
}

pub async fn messages(
    service: &WalletService,
    out: Output,
    topic_id: &str,
    window: Option<Duration>,
) -> anyhow::Result<()> {
    forms::validate_topic_id(topic_id)?;
    let records = match window {
        Some(window) => service.get_topic_messages_within(topic_id, window).await?,
        None => service.get_topic_messages(topic_id).await?,
    };
    if out.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    for record in &records {
        out.message(record);
    }
    println!("Loaded {} messages", records.len());
    Ok(())
}

/// Print every message until Ctrl-C.
pub async fn watch(service: &WalletService, out: Output, topic_id: &str) -> anyhow::Result<()> {
    forms::validate_topic_id(topic_id)?;
    let handle = service
        .subscribe_to_topic(topic_id, move |record| out.message(&record))
        .await?;
    if !out.json {
        println!("Now listening for new messages (Ctrl-C to stop)");
    }
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    handle.cancel();
    tracing::info!(topic = %topic_id, "stopped listening");
    Ok(())
}
