//! Detached Ed25519 signatures over serialized transaction bodies.
//!
//! The gateway receives the body text, the operator's public key and the
//! signature; the private half never leaves the process.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use hbar_types::{HbarError, KeyPair, PublicKey, Signature};

/// Sign `body` with the operator key pair.
pub fn sign_body(keys: &KeyPair, body: &[u8]) -> Signature {
    let signing_key = SigningKey::from_bytes(&keys.private.0);
    Signature(signing_key.sign(body).to_bytes())
}

/// Check that `signature` over `body` was made by `public`.
///
/// Uses strict verification, so malleable or small-order signatures are
/// refused as well.
pub fn verify_body(public: &PublicKey, body: &[u8], signature: &Signature) -> Result<(), HbarError> {
    let verifying_key = VerifyingKey::from_bytes(&public.0)
        .map_err(|e| HbarError::SignatureMismatch(format!("unusable public key {public}: {e}")))?;
    let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key
        .verify_strict(body, &signature)
        .map_err(|_| HbarError::SignatureMismatch(format!("not signed by {public}")))
}
