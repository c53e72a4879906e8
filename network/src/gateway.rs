//! JSON-RPC + WebSocket gateway client.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use hbar_types::{AccountId, ConsensusTimestamp, NetworkId, TopicId, TransactionId};

use crate::error::NetworkError;
use crate::ledger::LedgerNetwork;
use crate::operator::Operator;
use crate::response::{AccountBalance, AccountInfo, Receipt, TopicMessage, TransactionResponse};
use crate::stream::{TopicSender, TopicStream};
use crate::transaction::Transaction;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ── GatewayClient ───────────────────────────────────────────────────────

/// Client for a ledger gateway speaking JSON-RPC over HTTP, with topic
/// streams over WebSocket.
///
/// Transactions are signed locally with the operator key; the gateway only
/// ever sees the public key and the signature.
pub struct GatewayClient {
    http: reqwest::Client,
    gateway_url: String,
    ws_url: String,
    network: NetworkId,
    operator: RwLock<Option<Operator>>,
}

impl GatewayClient {
    /// Create a client for `network` using the given endpoints.
    pub fn new(
        network: NetworkId,
        gateway_url: impl Into<String>,
        ws_url: impl Into<String>,
    ) -> Result<Self, NetworkError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NetworkError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            gateway_url: gateway_url.into(),
            ws_url: ws_url.into(),
            network,
            operator: RwLock::new(None),
        })
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    fn current_operator(&self) -> Result<Operator, NetworkError> {
        self.operator
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(NetworkError::NoOperator)
    }

    /// Send a JSON-RPC request and return the `result` field.
    async fn rpc_call(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, NetworkError> {
        let mut body = params;
        let object = body
            .as_object_mut()
            .ok_or_else(|| NetworkError::Http("params must be a JSON object".into()))?;
        object.insert("action".to_string(), serde_json::json!(action));
        object.insert("network".to_string(), serde_json::json!(self.network.as_str()));

        let response = self
            .http
            .post(&self.gateway_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NetworkError::Http(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(NetworkError::Http(format!(
                "gateway returned HTTP {}",
                response.status()
            )));
        }

        let mut json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(format!("invalid JSON response: {e}")))?;

        if let Some(err) = json.get("error").and_then(|e| e.as_str()) {
            return Err(NetworkError::Gateway(err.to_string()));
        }

        Ok(match json.get_mut("result") {
            Some(result) => result.take(),
            None => json,
        })
    }

    async fn rpc_typed<T: DeserializeOwned>(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<T, NetworkError> {
        let result = self.rpc_call(action, params).await?;
        serde_json::from_value(result)
            .map_err(|e| NetworkError::InvalidResponse(format!("invalid {action} response: {e}")))
    }
}

#[async_trait]
impl LedgerNetwork for GatewayClient {
    fn set_operator(&self, operator: Option<Operator>) {
        *self.operator.write().unwrap_or_else(PoisonError::into_inner) = operator;
    }

    async fn submit(&self, transaction: Transaction) -> Result<TransactionResponse, NetworkError> {
        let operator = self.current_operator()?;
        let account_id = operator.parse_account_id()?;
        let keys = operator.keypair()?;

        let body = serde_json::to_string(&transaction)
            .map_err(|e| NetworkError::InvalidOperator(format!("unserializable body: {e}")))?;
        let signature = hbar_crypto::sign_body(&keys, body.as_bytes());

        debug!(kind = transaction.kind(), operator = %account_id, "submitting transaction");
        self.rpc_typed(
            "submit_transaction",
            serde_json::json!({
                "operator": account_id.to_string(),
                "public_key": keys.public.to_hex(),
                "body": body,
                "signature": signature.to_hex(),
            }),
        )
        .await
    }

    async fn receipt(&self, transaction_id: &TransactionId) -> Result<Receipt, NetworkError> {
        self.rpc_typed(
            "get_receipt",
            serde_json::json!({ "transaction_id": transaction_id.to_string() }),
        )
        .await
    }

    async fn account_info(&self, account_id: &AccountId) -> Result<AccountInfo, NetworkError> {
        self.rpc_typed(
            "account_info",
            serde_json::json!({ "account_id": account_id.to_string() }),
        )
        .await
    }

    async fn account_balance(&self, account_id: &AccountId) -> Result<AccountBalance, NetworkError> {
        self.rpc_typed(
            "account_balance",
            serde_json::json!({ "account_id": account_id.to_string() }),
        )
        .await
    }

    async fn subscribe_topic(
        &self,
        topic_id: &TopicId,
        start: ConsensusTimestamp,
    ) -> Result<TopicStream, NetworkError> {
        let (mut socket, _) = tokio_tungstenite::connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| NetworkError::Stream(format!("connect to {} failed: {e}", self.ws_url)))?;

        let request = serde_json::json!({
            "action": "subscribe",
            "topic_id": topic_id.to_string(),
            "start_time": start.to_string(),
        });
        socket
            .send(Message::Text(request.to_string()))
            .await
            .map_err(|e| NetworkError::Stream(format!("subscribe request failed: {e}")))?;

        let (tx, stream) = TopicStream::channel();
        let topic = *topic_id;
        let producer = tokio::spawn(async move {
            forward_frames(socket, tx, topic).await;
        });
        debug!(topic = %topic_id, "topic stream opened");
        Ok(stream.with_producer(producer))
    }
}

// ── Stream forwarding ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorFrame {
    error: String,
}

/// Forward WebSocket frames into the topic stream until either side closes.
async fn forward_frames(mut socket: Socket, tx: TopicSender, topic: TopicId) {
    loop {
        let frame = tokio::select! {
            frame = socket.next() => frame,
            _ = tx.closed() => break,
        };
        let text = match frame {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => break,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                let _ = tx.send(Err(NetworkError::Stream(e.to_string()))).await;
                break;
            }
        };

        let item = match serde_json::from_str::<TopicMessage>(&text) {
            Ok(message) => Ok(message),
            Err(parse_err) => match serde_json::from_str::<ErrorFrame>(&text) {
                Ok(frame) => Err(NetworkError::Stream(frame.error)),
                Err(_) => Err(NetworkError::InvalidResponse(format!(
                    "invalid topic frame: {parse_err}"
                ))),
            },
        };
        let failed = item.is_err();
        if tx.send(item).await.is_err() || failed {
            break;
        }
    }

    if let Err(e) = socket.close(None).await {
        warn!(topic = %topic, "closing topic socket failed: {e}");
    }
    debug!(topic = %topic, "topic stream closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_has_no_operator() {
        let client =
            GatewayClient::new(NetworkId::Local, "http://127.0.0.1:1/rpc", "ws://127.0.0.1:1/ws")
                .unwrap();
        assert!(matches!(
            client.current_operator(),
            Err(NetworkError::NoOperator)
        ));
        assert_eq!(client.gateway_url(), "http://127.0.0.1:1/rpc");
        assert_eq!(client.network(), NetworkId::Local);
    }

    #[tokio::test]
    async fn submit_without_operator_fails_before_any_request() {
        let client =
            GatewayClient::new(NetworkId::Local, "http://127.0.0.1:1/rpc", "ws://127.0.0.1:1/ws")
                .unwrap();
        let tx = Transaction::TopicCreate {
            memo: "m".into(),
            submit_key: None,
        };
        assert!(matches!(client.submit(tx).await, Err(NetworkError::NoOperator)));
    }

    #[tokio::test]
    async fn clearing_operator_removes_it() {
        let client =
            GatewayClient::new(NetworkId::Local, "http://127.0.0.1:1/rpc", "ws://127.0.0.1:1/ws")
                .unwrap();
        client.set_operator(Some(Operator::new("0.0.2", "11".repeat(32))));
        assert!(client.current_operator().is_ok());
        client.set_operator(None);
        assert!(client.current_operator().is_err());
    }
}
