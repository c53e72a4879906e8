//! Transaction bodies the wallet can submit.
//!
//! Each variant is one request the network signs with the operator key and
//! executes exactly once. The serde form is what the gateway signs and
//! receives.

use serde::{Deserialize, Serialize};

use hbar_types::{AccountId, Hbar, HbarError, PublicKey, TokenAmount, TokenId, TopicId};

/// A single submittable transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transaction {
    /// Move HBAR between accounts. Legs must sum to zero.
    Transfer { transfers: Vec<HbarTransfer> },
    /// Create a new token with the operator as treasury.
    TokenCreate(TokenCreate),
    /// Associate an account with tokens so it can hold them.
    TokenAssociate {
        account_id: AccountId,
        token_ids: Vec<TokenId>,
    },
    /// Move token units between accounts. Legs must sum to zero.
    TokenTransfer {
        token_id: TokenId,
        transfers: Vec<TokenTransfer>,
    },
    /// Create a consensus topic.
    TopicCreate {
        memo: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        submit_key: Option<PublicKey>,
    },
    /// Append a message to a topic.
    TopicMessageSubmit { topic_id: TopicId, message: String },
}

impl Transaction {
    /// Short name used in logs and spans.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::TokenCreate(_) => "token_create",
            Self::TokenAssociate { .. } => "token_associate",
            Self::TokenTransfer { .. } => "token_transfer",
            Self::TopicCreate { .. } => "topic_create",
            Self::TopicMessageSubmit { .. } => "topic_message_submit",
        }
    }

    /// Two-leg HBAR transfer from `from` to `to`.
    pub fn hbar_transfer(from: AccountId, to: AccountId, amount: Hbar) -> Self {
        Self::Transfer {
            transfers: vec![
                HbarTransfer {
                    account_id: from,
                    amount: -amount,
                },
                HbarTransfer {
                    account_id: to,
                    amount,
                },
            ],
        }
    }

    /// Two-leg token transfer from `from` to `to`.
    pub fn token_transfer(
        token_id: TokenId,
        from: AccountId,
        to: AccountId,
        amount: TokenAmount,
    ) -> Result<Self, HbarError> {
        let units = i64::try_from(amount.raw())
            .map_err(|_| HbarError::AmountOverflow(amount.to_string()))?;
        Ok(Self::TokenTransfer {
            token_id,
            transfers: vec![
                TokenTransfer {
                    account_id: from,
                    amount: -units,
                },
                TokenTransfer {
                    account_id: to,
                    amount: units,
                },
            ],
        })
    }
}

/// One leg of an HBAR transfer; negative amounts debit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HbarTransfer {
    pub account_id: AccountId,
    pub amount: Hbar,
}

/// One leg of a token transfer in smallest units; negative amounts debit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub account_id: AccountId,
    pub amount: i64,
}

/// Parameters of a token-create transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreate {
    pub name: String,
    pub symbol: String,
    pub token_type: TokenType,
    pub decimals: u32,
    /// Initial supply in smallest units, credited to the treasury.
    pub initial_supply: TokenAmount,
    pub treasury: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<PublicKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_key: Option<PublicKey>,
    pub freeze_default: bool,
    pub supply_type: SupplyType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    FungibleCommon,
    NonFungibleUnique,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SupplyType {
    Infinite,
    Finite { max_supply: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hbar_transfer_legs_balance() {
        let tx = Transaction::hbar_transfer(
            AccountId::from_num(1),
            AccountId::from_num(2),
            Hbar::from_tinybars(500),
        );
        let Transaction::Transfer { transfers } = tx else {
            panic!("expected transfer");
        };
        assert_eq!(transfers[0].amount.tinybars(), -500);
        assert_eq!(transfers[1].amount.tinybars(), 500);
    }

    #[test]
    fn token_transfer_legs_balance() {
        let tx = Transaction::token_transfer(
            TokenId::from_num(9),
            AccountId::from_num(1),
            AccountId::from_num(2),
            TokenAmount::new(700),
        )
        .unwrap();
        let Transaction::TokenTransfer { transfers, .. } = tx else {
            panic!("expected token transfer");
        };
        assert_eq!(transfers.iter().map(|t| t.amount).sum::<i64>(), 0);
    }

    #[test]
    fn token_transfer_rejects_amounts_beyond_i64() {
        let result = Transaction::token_transfer(
            TokenId::from_num(9),
            AccountId::from_num(1),
            AccountId::from_num(2),
            TokenAmount::new(u64::MAX),
        );
        assert!(matches!(result, Err(HbarError::AmountOverflow(_))));
    }

    #[test]
    fn serde_is_tagged() {
        let tx = Transaction::TopicMessageSubmit {
            topic_id: TopicId::from_num(5),
            message: "hello".into(),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "topic_message_submit");
        assert_eq!(json["topic_id"], "0.0.5");
        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }
}
