//! Ed25519 key handling.

use ed25519_dalek::SigningKey;
use hbar_types::{HbarError, KeyPair, PrivateKey, PublicKey};

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

/// Reconstruct a full key pair from a private key.
pub fn keypair_from_private(private: PrivateKey) -> KeyPair {
    let public = public_from_private(&private);
    KeyPair { public, private }
}

/// Parse an operator key written as 64 hex characters into a key pair.
pub fn keypair_from_hex(text: &str) -> Result<KeyPair, HbarError> {
    PrivateKey::from_hex(text).map(keypair_from_private)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_key_derives_stable_public_key() {
        let a = keypair_from_hex(&"11".repeat(32)).unwrap();
        let b = keypair_from_hex(&"11".repeat(32)).unwrap();
        assert_eq!(a.public, b.public);
    }

    #[test]
    fn different_keys_differ() {
        let a = keypair_from_hex(&"11".repeat(32)).unwrap();
        let b = keypair_from_hex(&"22".repeat(32)).unwrap();
        assert_ne!(a.public, b.public);
    }

    #[test]
    fn short_key_is_rejected() {
        assert!(keypair_from_hex("abcde").is_err());
    }
}
