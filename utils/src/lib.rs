//! Shared utilities for the hbar wallet.

pub mod logging;
pub mod tracing_spans;

pub use logging::{init_logging, LogFormat};
