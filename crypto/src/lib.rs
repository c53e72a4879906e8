//! Signing primitives for the hbar wallet.
//!
//! - **Ed25519** for transaction signing and signature verification
//! - Operator keys arrive as 64-character hex strings and are parsed here

pub mod keys;
pub mod sign;

pub use keys::{keypair_from_hex, keypair_from_private, public_from_private};
pub use sign::{sign_body, verify_body};
