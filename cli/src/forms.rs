//! Form-level input checks, applied before anything reaches the wallet.
//!
//! Only required fields, the account id shape and the key length are
//! checked here. Amounts and ids are passed through as typed text;
//! the wallet reports anything else as a failed result.

use thiserror::Error;

/// Required length of an operator private key, in characters.
pub const PRIVATE_KEY_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a token ID")]
    MissingTokenId,

    #[error("Please enter a topic memo")]
    MissingTopicMemo,

    #[error("Please enter a topic ID")]
    MissingTopicId,

    #[error("Account ID must be in format 0.0.123456")]
    InvalidAccountId,

    #[error("Private key must be {PRIVATE_KEY_LEN} characters long")]
    InvalidPrivateKey,
}

/// `true` for ids of the form `0.0.<digits>`.
pub fn is_account_id(text: &str) -> bool {
    text.strip_prefix("0.0.")
        .is_some_and(|num| !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()))
}

/// Every field must be non-empty.
pub fn require_all(fields: &[&str]) -> Result<(), FormError> {
    if fields.iter().any(|field| field.is_empty()) {
        return Err(FormError::MissingFields);
    }
    Ok(())
}

pub fn validate_connect(account_id: &str, private_key: &str) -> Result<(), FormError> {
    require_all(&[account_id, private_key])?;
    if !is_account_id(account_id) {
        return Err(FormError::InvalidAccountId);
    }
    if private_key.chars().count() != PRIVATE_KEY_LEN {
        return Err(FormError::InvalidPrivateKey);
    }
    Ok(())
}

pub fn validate_token_id(token_id: &str) -> Result<(), FormError> {
    if token_id.is_empty() {
        return Err(FormError::MissingTokenId);
    }
    Ok(())
}

pub fn validate_topic_memo(memo: &str) -> Result<(), FormError> {
    if memo.is_empty() {
        return Err(FormError::MissingTopicMemo);
    }
    Ok(())
}

pub fn validate_topic_id(topic_id: &str) -> Result<(), FormError> {
    if topic_id.is_empty() {
        return Err(FormError::MissingTopicId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";

    #[test]
    fn accepts_well_formed_credentials() {
        assert_eq!(validate_connect("0.0.123456", KEY), Ok(()));
    }

    #[test]
    fn rejects_malformed_account_id() {
        assert_eq!(
            validate_connect("invalid", KEY),
            Err(FormError::InvalidAccountId)
        );
        assert!(!is_account_id("0.0."));
        assert!(!is_account_id("1.0.5"));
        assert!(!is_account_id("0.0.5a"));
        assert!(is_account_id("0.0.5"));
    }

    #[test]
    fn rejects_short_key() {
        assert_eq!(
            validate_connect("0.0.123456", "abcde"),
            Err(FormError::InvalidPrivateKey)
        );
    }

    #[test]
    fn key_contents_are_not_checked() {
        assert_eq!(validate_connect("0.0.1", &"z".repeat(64)), Ok(()));
    }

    #[test]
    fn empty_fields_come_first() {
        assert_eq!(validate_connect("", KEY), Err(FormError::MissingFields));
        assert_eq!(validate_connect("invalid", ""), Err(FormError::MissingFields));
        assert_eq!(require_all(&["a", "", "c"]), Err(FormError::MissingFields));
        assert_eq!(require_all(&["a", "b"]), Ok(()));
    }

    #[test]
    fn single_field_forms() {
        assert_eq!(validate_token_id(""), Err(FormError::MissingTokenId));
        assert_eq!(validate_topic_memo(""), Err(FormError::MissingTopicMemo));
        assert_eq!(validate_topic_id(""), Err(FormError::MissingTopicId));
        assert_eq!(validate_topic_id("0.0.9"), Ok(()));
    }

    #[test]
    fn messages_match_the_forms() {
        assert_eq!(FormError::MissingFields.to_string(), "Please fill in all fields");
        assert_eq!(
            FormError::InvalidPrivateKey.to_string(),
            "Private key must be 64 characters long"
        );
    }
}
