//! Nullable ledger: an in-memory network that executes transactions
//! instead of sending them.

use async_trait::async_trait;
use sha2::{Digest, Sha384};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tokio::sync::broadcast;

use hbar_network::{
    AccountBalance, AccountInfo, LedgerNetwork, NetworkError, Operator, Receipt, TokenBalance,
    TopicMessage, TopicStream, Transaction, TransactionResponse,
};
use hbar_network::{HbarTransfer, TokenCreate, TokenTransfer};
use hbar_types::{
    AccountId, ConsensusTimestamp, Hbar, PublicKey, Status, TokenAmount, TokenId, TopicId,
    TransactionId,
};

use crate::clock::NullClock;

/// Live message fan-out capacity per topic.
const LIVE_CAPACITY: usize = 256;

/// First entity number handed out to tokens and topics.
const FIRST_ENTITY_NUM: u64 = 1001;

/// A test ledger that executes transactions against in-memory state.
///
/// Transactions are checked the way a real network would check them:
/// the payer must exist and sign with its own key, debits must be covered,
/// tokens must be associated before they move, private topics only accept
/// messages signed with their submit key. Failures are reported through the
/// receipt status, never as errors from `submit`.
///
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullLedger {
    state: Mutex<LedgerState>,
    clock: NullClock,
}

struct LedgerState {
    operator: Option<Operator>,
    accounts: BTreeMap<AccountId, NullAccount>,
    tokens: BTreeMap<TokenId, NullToken>,
    topics: BTreeMap<TopicId, NullTopic>,
    receipts: HashMap<TransactionId, Receipt>,
    submitted: Vec<Transaction>,
    next_entity: u64,
    offline: bool,
    reject_next_submit: Option<Status>,
    fail_next_receipt: Option<Status>,
}

struct NullAccount {
    key: PublicKey,
    hbars: Hbar,
    memo: String,
    /// Associated tokens in association order.
    tokens: Vec<(TokenId, TokenAmount)>,
}

impl NullAccount {
    fn token_balance(&self, token_id: &TokenId) -> Option<TokenAmount> {
        self.tokens
            .iter()
            .find(|(id, _)| id == token_id)
            .map(|(_, amount)| *amount)
    }

    fn set_token_balance(&mut self, token_id: &TokenId, amount: TokenAmount) {
        if let Some(entry) = self.tokens.iter_mut().find(|(id, _)| id == token_id) {
            entry.1 = amount;
        }
    }
}

struct NullToken {
    name: String,
    symbol: String,
}

struct NullTopic {
    submit_key: Option<PublicKey>,
    messages: Vec<TopicMessage>,
    running_hash: Vec<u8>,
    live: broadcast::Sender<TopicMessage>,
}

/// Result of executing one transaction body.
type Outcome = Result<Receipt, Status>;

impl NullLedger {
    pub fn new() -> Self {
        Self::with_clock(NullClock::default())
    }

    pub fn with_clock(clock: NullClock) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                operator: None,
                accounts: BTreeMap::new(),
                tokens: BTreeMap::new(),
                topics: BTreeMap::new(),
                receipts: HashMap::new(),
                submitted: Vec::new(),
                next_entity: FIRST_ENTITY_NUM,
                offline: false,
                reject_next_submit: None,
                fail_next_receipt: None,
            }),
            clock,
        }
    }

    /// Register an account controlled by `key`.
    pub fn add_account(&self, account_id: AccountId, key: PublicKey, hbars: Hbar) {
        self.state.lock().unwrap().accounts.insert(
            account_id,
            NullAccount {
                key,
                hbars,
                memo: String::new(),
                tokens: Vec::new(),
            },
        );
    }

    /// Make every call fail as if the network were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Reject the next submission at precheck with `status`.
    pub fn reject_next_submit(&self, status: Status) {
        self.state.lock().unwrap().reject_next_submit = Some(status);
    }

    /// Fail the next receipt query with `status`.
    pub fn fail_next_receipt(&self, status: Status) {
        self.state.lock().unwrap().fail_next_receipt = Some(status);
    }

    pub fn clock(&self) -> &NullClock {
        &self.clock
    }

    /// Every transaction accepted by `submit`, in order (for assertions).
    pub fn submitted(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Account id of the current operator, if one is set.
    pub fn operator_account(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .operator
            .as_ref()
            .map(|op| op.account_id().to_string())
    }

    pub fn hbar_balance(&self, account_id: &AccountId) -> Option<Hbar> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(account_id)
            .map(|account| account.hbars)
    }

    /// Token balance of an associated account; `None` if not associated.
    pub fn token_balance(&self, account_id: &AccountId, token_id: &TokenId) -> Option<TokenAmount> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(account_id)
            .and_then(|account| account.token_balance(token_id))
    }

    /// Name and symbol of a created token.
    pub fn token_info(&self, token_id: &TokenId) -> Option<(String, String)> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .get(token_id)
            .map(|token| (token.name.clone(), token.symbol.clone()))
    }

    pub fn topic_messages(&self, topic_id: &TopicId) -> Vec<TopicMessage> {
        self.state
            .lock()
            .unwrap()
            .topics
            .get(topic_id)
            .map(|topic| topic.messages.clone())
            .unwrap_or_default()
    }

    pub fn topic_submit_key(&self, topic_id: &TopicId) -> Option<PublicKey> {
        self.state
            .lock()
            .unwrap()
            .topics
            .get(topic_id)
            .and_then(|topic| topic.submit_key)
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerNetwork for NullLedger {
    fn set_operator(&self, operator: Option<Operator>) {
        self.state.lock().unwrap().operator = operator;
    }

    async fn submit(&self, transaction: Transaction) -> Result<TransactionResponse, NetworkError> {
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return Err(NetworkError::Http("network unreachable".into()));
        }
        let operator = state.operator.clone().ok_or(NetworkError::NoOperator)?;
        let payer = operator.parse_account_id()?;
        let signer = operator.keypair()?.public;

        if let Some(status) = state.reject_next_submit.take() {
            return Err(NetworkError::Precheck(status));
        }
        match state.accounts.get(&payer) {
            None => {
                return Err(NetworkError::Precheck(Status::from_code(
                    "PAYER_ACCOUNT_NOT_FOUND",
                )))
            }
            Some(account) if account.key != signer => {
                return Err(NetworkError::Precheck(Status::InvalidSignature))
            }
            Some(_) => {}
        }

        let consensus = self.clock.tick();
        let transaction_id = TransactionId::new(payer, consensus);
        let receipt = state
            .execute(&transaction, payer, signer, consensus)
            .unwrap_or_else(Receipt::with_status);
        state.receipts.insert(transaction_id, receipt);
        state.submitted.push(transaction);
        Ok(TransactionResponse { transaction_id })
    }

    async fn receipt(&self, transaction_id: &TransactionId) -> Result<Receipt, NetworkError> {
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return Err(NetworkError::Http("network unreachable".into()));
        }
        if let Some(status) = state.fail_next_receipt.take() {
            return Err(NetworkError::Query(status));
        }
        state
            .receipts
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| NetworkError::UnknownTransaction(transaction_id.to_string()))
    }

    async fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo, NetworkError> {
        let state = self.state.lock().unwrap();
        if state.offline {
            return Err(NetworkError::Http("network unreachable".into()));
        }
        let account = state
            .accounts
            .get(account_id)
            .ok_or(NetworkError::Query(Status::InvalidAccountId))?;
        Ok(AccountInfo {
            account_id: *account_id,
            key: Some(account.key),
            balance: account.hbars,
            memo: account.memo.clone(),
        })
    }

    async fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance, NetworkError> {
        let state = self.state.lock().unwrap();
        if state.offline {
            return Err(NetworkError::Http("network unreachable".into()));
        }
        let account = state
            .accounts
            .get(account_id)
            .ok_or(NetworkError::Query(Status::InvalidAccountId))?;
        Ok(AccountBalance {
            account_id: *account_id,
            hbars: account.hbars,
            tokens: account
                .tokens
                .iter()
                .map(|(token_id, balance)| TokenBalance {
                    token_id: *token_id,
                    balance: *balance,
                })
                .collect(),
        })
    }

    async fn subscribe_topic(
        &self,
        topic_id: &TopicId,
        start: ConsensusTimestamp,
    ) -> Result<TopicStream, NetworkError> {
        // History and the live receiver are taken under one lock so no
        // message falls between them.
        let (history, mut live) = {
            let state = self.state.lock().unwrap();
            if state.offline {
                return Err(NetworkError::Stream("network unreachable".into()));
            }
            let topic = state
                .topics
                .get(topic_id)
                .ok_or(NetworkError::Query(Status::InvalidTopicId))?;
            let history: Vec<TopicMessage> = topic
                .messages
                .iter()
                .filter(|m| m.consensus_timestamp >= start)
                .cloned()
                .collect();
            (history, topic.live.subscribe())
        };

        let (tx, stream) = TopicStream::channel();
        let producer = tokio::spawn(async move {
            for message in history {
                if tx.send(Ok(message)).await.is_err() {
                    return;
                }
            }
            loop {
                let next = tokio::select! {
                    next = live.recv() => next,
                    _ = tx.closed() => return,
                };
                let item = match next {
                    Ok(message) if message.consensus_timestamp < start => continue,
                    Ok(message) => Ok(message),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => Err(NetworkError::Stream(
                        format!("subscriber lagged, {skipped} messages dropped"),
                    )),
                    Err(broadcast::error::RecvError::Closed) => return,
                };
                let failed = item.is_err();
                if tx.send(item).await.is_err() || failed {
                    return;
                }
            }
        });
        Ok(stream.with_producer(producer))
    }
}

// ── Execution ───────────────────────────────────────────────────────────

impl LedgerState {
    fn execute(
        &mut self,
        transaction: &Transaction,
        payer: AccountId,
        signer: PublicKey,
        consensus: ConsensusTimestamp,
    ) -> Outcome {
        match transaction {
            Transaction::Transfer { transfers } => self.transfer_hbar(transfers, signer),
            Transaction::TokenCreate(create) => self.create_token(create),
            Transaction::TokenAssociate {
                account_id,
                token_ids,
            } => self.associate(account_id, token_ids, signer),
            Transaction::TokenTransfer {
                token_id,
                transfers,
            } => self.transfer_token(token_id, transfers, signer),
            Transaction::TopicCreate { submit_key, .. } => Ok(self.create_topic(*submit_key)),
            Transaction::TopicMessageSubmit { topic_id, message } => {
                self.submit_message(topic_id, message, payer, signer, consensus)
            }
        }
    }

    fn next_num(&mut self) -> u64 {
        let num = self.next_entity;
        self.next_entity += 1;
        num
    }

    fn account_for_debit(&self, account_id: &AccountId, signer: PublicKey) -> Result<&NullAccount, Status> {
        let account = self.accounts.get(account_id).ok_or(Status::InvalidAccountId)?;
        if account.key != signer {
            return Err(Status::InvalidSignature);
        }
        Ok(account)
    }

    fn transfer_hbar(&mut self, transfers: &[HbarTransfer], signer: PublicKey) -> Outcome {
        let mut sum: i128 = 0;
        let mut updated: BTreeMap<AccountId, Hbar> = BTreeMap::new();
        for leg in transfers {
            sum += leg.amount.tinybars() as i128;
            let current = match updated.get(&leg.account_id) {
                Some(balance) => *balance,
                None if leg.amount.is_negative() => {
                    self.account_for_debit(&leg.account_id, signer)?.hbars
                }
                None => {
                    self.accounts
                        .get(&leg.account_id)
                        .ok_or(Status::InvalidAccountId)?
                        .hbars
                }
            };
            let next = current
                .checked_add(leg.amount)
                .ok_or(Status::InvalidTransactionBody)?;
            if next.is_negative() {
                return Err(Status::InsufficientPayerBalance);
            }
            updated.insert(leg.account_id, next);
        }
        if sum != 0 {
            return Err(Status::from_code("INVALID_ACCOUNT_AMOUNTS"));
        }
        for (account_id, balance) in updated {
            if let Some(account) = self.accounts.get_mut(&account_id) {
                account.hbars = balance;
            }
        }
        Ok(Receipt::with_status(Status::Success))
    }

    fn create_token(&mut self, create: &TokenCreate) -> Outcome {
        if create.name.is_empty() || create.symbol.is_empty() {
            return Err(Status::InvalidTransactionBody);
        }
        if !self.accounts.contains_key(&create.treasury) {
            return Err(Status::InvalidAccountId);
        }
        let token_id = TokenId::from_num(self.next_num());
        self.tokens.insert(
            token_id,
            NullToken {
                name: create.name.clone(),
                symbol: create.symbol.clone(),
            },
        );
        if let Some(treasury) = self.accounts.get_mut(&create.treasury) {
            treasury.tokens.push((token_id, create.initial_supply));
        }
        Ok(Receipt {
            token_id: Some(token_id),
            ..Receipt::with_status(Status::Success)
        })
    }

    fn associate(&mut self, account_id: &AccountId, token_ids: &[TokenId], signer: PublicKey) -> Outcome {
        let account = self.account_for_debit(account_id, signer)?;
        for token_id in token_ids {
            if !self.tokens.contains_key(token_id) {
                return Err(Status::InvalidTokenId);
            }
            if account.token_balance(token_id).is_some() {
                return Err(Status::TokenAlreadyAssociatedToAccount);
            }
        }
        if let Some(account) = self.accounts.get_mut(account_id) {
            account
                .tokens
                .extend(token_ids.iter().map(|id| (*id, TokenAmount::new(0))));
        }
        Ok(Receipt::with_status(Status::Success))
    }

    fn transfer_token(
        &mut self,
        token_id: &TokenId,
        transfers: &[TokenTransfer],
        signer: PublicKey,
    ) -> Outcome {
        if !self.tokens.contains_key(token_id) {
            return Err(Status::InvalidTokenId);
        }
        let mut sum: i128 = 0;
        let mut updated: BTreeMap<AccountId, TokenAmount> = BTreeMap::new();
        for leg in transfers {
            sum += leg.amount as i128;
            let current = match updated.get(&leg.account_id) {
                Some(balance) => *balance,
                None => {
                    let account = if leg.amount < 0 {
                        self.account_for_debit(&leg.account_id, signer)?
                    } else {
                        self.accounts
                            .get(&leg.account_id)
                            .ok_or(Status::InvalidAccountId)?
                    };
                    account
                        .token_balance(token_id)
                        .ok_or(Status::TokenNotAssociatedToAccount)?
                }
            };
            let delta = TokenAmount::new(leg.amount.unsigned_abs());
            let next = if leg.amount < 0 {
                current
                    .checked_sub(delta)
                    .ok_or(Status::InsufficientTokenBalance)?
            } else {
                current
                    .checked_add(delta)
                    .ok_or(Status::InvalidTransactionBody)?
            };
            updated.insert(leg.account_id, next);
        }
        if sum != 0 {
            return Err(Status::from_code("TRANSFERS_NOT_ZERO_SUM_FOR_TOKEN"));
        }
        for (account_id, balance) in updated {
            if let Some(account) = self.accounts.get_mut(&account_id) {
                account.set_token_balance(token_id, balance);
            }
        }
        Ok(Receipt::with_status(Status::Success))
    }

    fn create_topic(&mut self, submit_key: Option<PublicKey>) -> Receipt {
        let topic_id = TopicId::from_num(self.next_num());
        let (live, _) = broadcast::channel(LIVE_CAPACITY);
        self.topics.insert(
            topic_id,
            NullTopic {
                submit_key,
                messages: Vec::new(),
                running_hash: vec![0; 48],
                live,
            },
        );
        Receipt {
            topic_id: Some(topic_id),
            ..Receipt::with_status(Status::Success)
        }
    }

    fn submit_message(
        &mut self,
        topic_id: &TopicId,
        message: &str,
        payer: AccountId,
        signer: PublicKey,
        consensus: ConsensusTimestamp,
    ) -> Outcome {
        let topic = self.topics.get_mut(topic_id).ok_or(Status::InvalidTopicId)?;
        if topic.submit_key.is_some_and(|key| key != signer) {
            return Err(Status::InvalidSignature);
        }
        let sequence_number = topic.messages.len() as u64 + 1;
        let running_hash = running_hash(
            &topic.running_hash,
            topic_id,
            &payer,
            consensus,
            sequence_number,
            message.as_bytes(),
        );
        let record = TopicMessage {
            consensus_timestamp: consensus,
            contents: message.as_bytes().to_vec(),
            sequence_number,
            running_hash: running_hash.clone(),
        };
        topic.running_hash = running_hash;
        topic.messages.push(record.clone());
        // No live subscribers is fine.
        let _ = topic.live.send(record);
        Ok(Receipt {
            topic_sequence_number: Some(sequence_number),
            ..Receipt::with_status(Status::Success)
        })
    }
}

/// SHA-384 over the previous running hash and the new message's identity.
fn running_hash(
    previous: &[u8],
    topic_id: &TopicId,
    payer: &AccountId,
    consensus: ConsensusTimestamp,
    sequence_number: u64,
    contents: &[u8],
) -> Vec<u8> {
    let mut hasher = Sha384::new();
    hasher.update(previous);
    hasher.update(topic_id.to_string().as_bytes());
    hasher.update(payer.to_string().as_bytes());
    hasher.update(consensus.seconds.to_be_bytes());
    hasher.update(consensus.nanos.to_be_bytes());
    hasher.update(sequence_number.to_be_bytes());
    hasher.update(Sha384::digest(contents));
    hasher.finalize().to_vec()
}
