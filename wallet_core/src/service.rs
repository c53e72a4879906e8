//! The wallet facade: one method per ledger operation.
//!
//! Mutating operations never fail with `Err` once a session exists: parse
//! errors, transport failures and non-success receipts all come back as a
//! [`TransactionResult`] with `success == false`. Reads return `Err`.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{error, info, warn, Instrument};

use hbar_network::{
    GatewayClient, LedgerNetwork, SupplyType, TokenCreate, TokenType, Transaction,
};
use hbar_types::{
    AccountId, ConsensusTimestamp, HbarError, Hbar, TokenAmount, TokenId, TopicId, TOKEN_DECIMALS,
};
use hbar_utils::tracing_spans;

use crate::config::WalletConfig;
use crate::credentials::CredentialStore;
use crate::error::WalletError;
use crate::result::{AccountSnapshot, Operation, TopicMessageRecord, TransactionResult};
use crate::session::Session;
use crate::subscription::SubscriptionHandle;

/// Default observation window of [`WalletService::get_topic_messages`].
pub const DEFAULT_TOPIC_FETCH_WINDOW: Duration = Duration::from_millis(2_000);

/// The wallet: a session plus the network it signs for.
pub struct WalletService {
    network: Arc<dyn LedgerNetwork>,
    session: RwLock<Option<Session>>,
    topic_fetch_window: Duration,
}

impl WalletService {
    pub fn new(network: Arc<dyn LedgerNetwork>) -> Self {
        Self {
            network,
            session: RwLock::new(None),
            topic_fetch_window: DEFAULT_TOPIC_FETCH_WINDOW,
        }
    }

    /// A service talking to the gateway named in `config`.
    pub fn from_config(config: &WalletConfig) -> Result<Self, WalletError> {
        let gateway = GatewayClient::new(config.network, &config.gateway_url, &config.ws_url)?;
        Ok(Self::new(Arc::new(gateway)).with_topic_fetch_window(config.topic_fetch_window()))
    }

    pub fn with_topic_fetch_window(mut self, window: Duration) -> Self {
        self.topic_fetch_window = window;
        self
    }

    pub fn topic_fetch_window(&self) -> Duration {
        self.topic_fetch_window
    }

    // ── Session ─────────────────────────────────────────────────────────

    /// Replace the active session and reconfigure the network operator.
    /// `None` clears both; clearing twice is fine.
    pub fn set_session(&self, session: Option<Session>) {
        let mut slot = self.session.write().unwrap_or_else(PoisonError::into_inner);
        self.network.set_operator(session.as_ref().map(Session::operator));
        *slot = session;
    }

    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn require_session(&self) -> Result<Session, WalletError> {
        self.session().ok_or(WalletError::NoCredentials)
    }

    /// Sign in: install `session`, verify it against the network, then
    /// persist it. On failure the session is cleared again and nothing is
    /// stored.
    pub async fn connect(
        &self,
        session: Session,
        store: &CredentialStore,
    ) -> Result<AccountSnapshot, WalletError> {
        self.set_session(Some(session.clone()));
        match self.get_account_info().await {
            Ok(snapshot) => {
                store.save(&session)?;
                info!(account = %session.account_id, "connected");
                Ok(snapshot)
            }
            Err(e) => {
                self.set_session(None);
                error!(account = %session.account_id, "failed to connect: {e}");
                Err(e)
            }
        }
    }

    /// Sign out and forget the stored session.
    pub fn disconnect(&self, store: &CredentialStore) -> Result<(), WalletError> {
        self.set_session(None);
        store.clear()
    }

    /// Install the stored session, if any. Returns whether one was found.
    pub fn restore(&self, store: &CredentialStore) -> Result<bool, WalletError> {
        let stored = store.load()?;
        let found = stored.is_some();
        if found {
            self.set_session(stored);
        }
        Ok(found)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Fresh info and balances of the session account.
    pub async fn get_account_info(&self) -> Result<AccountSnapshot, WalletError> {
        let session = self.require_session()?;
        let span = tracing_spans::account_query_span(&session.account_id);
        async {
            let account_id: AccountId = session
                .account_id
                .parse()
                .map_err(|e: HbarError| WalletError::AccountInfo(e.to_string()))?;
            let info = self
                .network
                .account_info(&account_id)
                .await
                .map_err(|e| WalletError::AccountInfo(e.to_string()))?;
            let balance = self
                .network
                .account_balance(&account_id)
                .await
                .map_err(|e| WalletError::AccountInfo(e.to_string()))?;
            Ok::<_, WalletError>(AccountSnapshot::from_queries(info, balance))
        }
        .instrument(span)
        .await
        .inspect_err(|e| error!("{e}"))
    }

    /// Topic history delivered within the configured window.
    ///
    /// Best effort: the stream has no end-of-history signal, so messages
    /// that arrive after the window are not included.
    pub async fn get_topic_messages(
        &self,
        topic_id: &str,
    ) -> Result<Vec<TopicMessageRecord>, WalletError> {
        self.get_topic_messages_within(topic_id, self.topic_fetch_window)
            .await
    }

    /// Topic history delivered within `window`.
    pub async fn get_topic_messages_within(
        &self,
        topic_id: &str,
        window: Duration,
    ) -> Result<Vec<TopicMessageRecord>, WalletError> {
        let span = tracing_spans::topic_fetch_span(topic_id, window.as_millis());
        async {
            let topic: TopicId = topic_id
                .parse()
                .map_err(|e: HbarError| WalletError::TopicMessages(e.to_string()))?;
            let mut stream = self
                .network
                .subscribe_topic(&topic, ConsensusTimestamp::EPOCH)
                .await
                .map_err(|e| WalletError::TopicMessages(e.to_string()))?;

            let deadline = tokio::time::sleep(window);
            tokio::pin!(deadline);
            let mut records = Vec::new();
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    next = stream.next() => match next {
                        Some(Ok(message)) => records.push(TopicMessageRecord::from(message)),
                        Some(Err(e)) => return Err(WalletError::TopicMessages(e.to_string())),
                        None => {
                            // The producer stopped early; still honour the window.
                            (&mut deadline).await;
                            break;
                        }
                    },
                }
            }
            Ok::<_, WalletError>(records)
        }
        .instrument(span)
        .await
        .inspect_err(|e| error!("{e}"))
    }

    /// Call `callback` for every message on the topic, history first, until
    /// the returned handle is cancelled or dropped.
    pub async fn subscribe_to_topic<F>(
        &self,
        topic_id: &str,
        callback: F,
    ) -> Result<SubscriptionHandle, WalletError>
    where
        F: FnMut(TopicMessageRecord) + Send + 'static,
    {
        let topic: TopicId = topic_id
            .parse()
            .map_err(|e: HbarError| WalletError::Subscribe(e.to_string()))?;
        let stream = self
            .network
            .subscribe_topic(&topic, ConsensusTimestamp::EPOCH)
            .await
            .map_err(|e| WalletError::Subscribe(e.to_string()))
            .inspect_err(|e| error!("{e}"))?;
        Ok(SubscriptionHandle::spawn(topic, stream, callback))
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Transfer `amount` HBAR (decimal string) from the session account to
    /// `recipient`.
    pub async fn send_hbar(
        &self,
        recipient: &str,
        amount: &str,
    ) -> Result<TransactionResult, WalletError> {
        self.execute(Operation::SendHbar, |session| {
            let from: AccountId = session.account_id.parse()?;
            let to: AccountId = recipient.parse()?;
            let amount: Hbar = amount.parse()?;
            Ok(Transaction::hbar_transfer(from, to, amount))
        })
        .await
    }

    /// Create a fungible token with the session account as treasury and
    /// `initial_supply` whole units.
    pub async fn create_token(
        &self,
        name: &str,
        symbol: &str,
        initial_supply: &str,
    ) -> Result<TransactionResult, WalletError> {
        self.execute(Operation::CreateToken, |session| {
            let treasury: AccountId = session.account_id.parse()?;
            let key = hbar_crypto::keypair_from_hex(&session.private_key)?.public;
            Ok(Transaction::TokenCreate(TokenCreate {
                name: name.to_string(),
                symbol: symbol.to_string(),
                token_type: TokenType::FungibleCommon,
                decimals: TOKEN_DECIMALS,
                initial_supply: TokenAmount::from_whole_units(initial_supply)?,
                treasury,
                admin_key: Some(key),
                supply_key: Some(key),
                freeze_default: false,
                supply_type: SupplyType::Infinite,
            }))
        })
        .await
    }

    /// Associate the session account with `token_id`.
    pub async fn associate_token(&self, token_id: &str) -> Result<TransactionResult, WalletError> {
        self.execute(Operation::AssociateToken, |session| {
            let account_id: AccountId = session.account_id.parse()?;
            let token: TokenId = token_id.parse()?;
            Ok(Transaction::TokenAssociate {
                account_id,
                token_ids: vec![token],
            })
        })
        .await
    }

    /// Transfer `amount` whole units of `token_id` to `recipient`.
    pub async fn send_token(
        &self,
        recipient: &str,
        token_id: &str,
        amount: &str,
    ) -> Result<TransactionResult, WalletError> {
        self.execute(Operation::SendToken, |session| {
            let from: AccountId = session.account_id.parse()?;
            let to: AccountId = recipient.parse()?;
            let token: TokenId = token_id.parse()?;
            let amount = TokenAmount::from_whole_units(amount)?;
            Transaction::token_transfer(token, from, to, amount)
        })
        .await
    }

    /// Create a topic; a private topic only accepts messages signed with the
    /// session key.
    pub async fn create_topic(
        &self,
        memo: &str,
        is_private: bool,
    ) -> Result<TransactionResult, WalletError> {
        self.execute(Operation::CreateTopic, |session| {
            let submit_key = if is_private {
                Some(hbar_crypto::keypair_from_hex(&session.private_key)?.public)
            } else {
                None
            };
            Ok(Transaction::TopicCreate {
                memo: memo.to_string(),
                submit_key,
            })
        })
        .await
    }

    /// Append `message` to `topic_id`.
    pub async fn send_message(
        &self,
        topic_id: &str,
        message: &str,
    ) -> Result<TransactionResult, WalletError> {
        self.execute(Operation::SendMessage, |session| {
            let topic: TopicId = topic_id.parse()?;
            Ok(Transaction::TopicMessageSubmit {
                topic_id: topic,
                message: message.to_string(),
            })
        })
        .await
    }

    /// Check the session, build the transaction, submit it and settle the
    /// receipt. Only a missing session is returned as `Err`.
    async fn execute<B>(&self, operation: Operation, build: B) -> Result<TransactionResult, WalletError>
    where
        B: FnOnce(&Session) -> Result<Transaction, HbarError>,
    {
        let session = self.require_session()?;
        let span = tracing_spans::transaction_span(operation.name(), &session.account_id);
        let built = build(&session);
        drop(session);

        let result = async move {
            let transaction = match built {
                Ok(transaction) => transaction,
                Err(e) => {
                    warn!("invalid input: {e}");
                    return TransactionResult::failure(operation, e);
                }
            };
            self.settle(operation, transaction).await
        }
        .instrument(span)
        .await;
        Ok(result)
    }

    async fn settle(&self, operation: Operation, transaction: Transaction) -> TransactionResult {
        let response = match self.network.submit(transaction).await {
            Ok(response) => response,
            Err(e) => {
                error!("submit failed: {e}");
                return TransactionResult::failure(operation, e);
            }
        };
        let transaction_id = response.transaction_id;
        let receipt = match self.network.receipt(&transaction_id).await {
            Ok(receipt) => receipt,
            Err(e) => {
                error!(transaction = %transaction_id, "receipt failed: {e}");
                return TransactionResult::failure(operation, e);
            }
        };

        let result = TransactionResult::from_receipt(operation, transaction_id, receipt);
        match result.error() {
            None => info!(transaction = %transaction_id, "transaction succeeded"),
            Some(message) => warn!(transaction = %transaction_id, "{message}"),
        }
        result
    }
}
