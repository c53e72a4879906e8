//! Pre-built [`tracing::Span`] constructors for wallet operations.
//!
//! Consistent span names and field sets make it easy to filter and
//! correlate logs for a single user action.

use tracing::{info_span, Span};

/// Span covering one mutating wallet operation, from submit to receipt.
pub fn transaction_span(operation: &str, operator: &str) -> Span {
    info_span!("transaction", operation = %operation, operator = %operator)
}

/// Span covering an account info + balance refresh.
pub fn account_query_span(account: &str) -> Span {
    info_span!("account_query", account = %account)
}

/// Span covering a bounded topic history fetch.
pub fn topic_fetch_span(topic: &str, window_ms: u128) -> Span {
    info_span!("topic_fetch", topic = %topic, window_ms = %window_ms)
}

/// Span covering the lifetime of a live topic subscription.
pub fn topic_subscription_span(topic: &str) -> Span {
    info_span!("topic_subscription", topic = %topic)
}
