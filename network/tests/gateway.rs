//! GatewayClient against an in-process mock gateway.

use std::sync::{Arc, Mutex};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use hbar_network::{GatewayClient, LedgerNetwork, NetworkError, Operator, Transaction};
use hbar_types::{
    AccountId, ConsensusTimestamp, Hbar, NetworkId, PublicKey, Signature, Status, TopicId,
};

const OPERATOR_KEY: &str = "4f3edf983ac636a65a842ce7c78d9aa706d3b113bce9c46f30d7d21715b23b1d";

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<Value>>,
}

async fn rpc(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    state.requests.lock().unwrap().push(body.clone());
    let action = body["action"].as_str().unwrap_or_default();
    let reply = match action {
        "submit_transaction" => {
            let public = PublicKey::from_hex(body["public_key"].as_str().unwrap()).unwrap();
            let signature = Signature::from_hex(body["signature"].as_str().unwrap()).unwrap();
            let signed = body["body"].as_str().unwrap();
            if hbar_crypto::verify_body(&public, signed.as_bytes(), &signature).is_ok() {
                json!({ "result": { "transaction_id": "0.0.123456@1700000000.000000001" } })
            } else {
                json!({ "error": "INVALID_SIGNATURE" })
            }
        }
        "get_receipt" => json!({ "result": { "status": "SUCCESS", "topic_id": "0.0.900" } }),
        // Bare object without a result envelope.
        "account_info" => json!({
            "account_id": body["account_id"],
            "balance": 250_000_000,
            "memo": "",
        }),
        "account_balance" => json!({ "error": "INVALID_ACCOUNT_ID" }),
        _ => json!({ "error": format!("unknown action {action}") }),
    };
    Json(reply)
}

async fn ws(upgrade: WebSocketUpgrade) -> impl IntoResponse {
    upgrade.on_upgrade(serve_topic)
}

async fn serve_topic(mut socket: WebSocket) {
    let Some(Ok(Message::Text(request))) = socket.recv().await else {
        return;
    };
    let request: Value = serde_json::from_str(&request).unwrap();
    if request["topic_id"] == "0.0.404" {
        let _ = socket
            .send(Message::Text(json!({ "error": "INVALID_TOPIC_ID" }).to_string()))
            .await;
        return;
    }
    for seq in 1..=2u64 {
        let frame = json!({
            "consensus_timestamp": { "seconds": 100 + seq, "nanos": 0 },
            "contents": hex::encode(format!("message {seq}")),
            "sequence_number": seq,
            "running_hash": "00",
        });
        if socket.send(Message::Text(frame.to_string())).await.is_err() {
            return;
        }
    }
    // Hold the subscription open until the client goes away.
    while let Some(Ok(_)) = socket.recv().await {}
}

async fn spawn_gateway() -> (GatewayClient, Arc<MockState>) {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/rpc", post(rpc))
        .route("/ws", get(ws))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let client = GatewayClient::new(
        NetworkId::Local,
        format!("http://{addr}/rpc"),
        format!("ws://{addr}/ws"),
    )
    .unwrap();
    (client, state)
}

fn transfer() -> Transaction {
    Transaction::hbar_transfer(
        AccountId::from_num(123456),
        AccountId::from_num(654321),
        Hbar::from_hbars(10).unwrap(),
    )
}

#[tokio::test]
async fn submit_sends_signed_body() {
    let (client, state) = spawn_gateway().await;
    client.set_operator(Some(Operator::new("0.0.123456", OPERATOR_KEY)));

    let response = client.submit(transfer()).await.unwrap();
    assert_eq!(
        response.transaction_id.to_string(),
        "0.0.123456@1700000000.000000001"
    );

    let requests = state.requests.lock().unwrap();
    let sent = &requests[0];
    assert_eq!(sent["action"], "submit_transaction");
    assert_eq!(sent["network"], "local");
    assert_eq!(sent["operator"], "0.0.123456");
    let body: Transaction = serde_json::from_str(sent["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, transfer());
    assert!(!sent.to_string().contains(OPERATOR_KEY));
}

#[tokio::test]
async fn malformed_operator_key_fails_without_request() {
    let (client, state) = spawn_gateway().await;
    client.set_operator(Some(Operator::new("0.0.123456", "not-a-key")));

    let err = client.submit(transfer()).await.unwrap_err();
    assert!(matches!(err, NetworkError::InvalidOperator(_)));
    assert!(state.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn receipt_and_info_decode() {
    let (client, _state) = spawn_gateway().await;
    let tx_id = "0.0.1@5.6".parse().unwrap();

    let receipt = client.receipt(&tx_id).await.unwrap();
    assert_eq!(receipt.status, Status::Success);
    assert_eq!(receipt.topic_id, Some(TopicId::from_num(900)));

    let info = client.account_info(&AccountId::from_num(77)).await.unwrap();
    assert_eq!(info.account_id, AccountId::from_num(77));
    assert_eq!(info.balance, Hbar::from_tinybars(250_000_000));
}

#[tokio::test]
async fn gateway_error_surfaces_message() {
    let (client, _state) = spawn_gateway().await;
    let err = client
        .account_balance(&AccountId::from_num(1))
        .await
        .unwrap_err();
    assert!(matches!(&err, NetworkError::Gateway(msg) if msg == "INVALID_ACCOUNT_ID"));
}

#[tokio::test]
async fn unreachable_gateway_is_http_error() {
    let client =
        GatewayClient::new(NetworkId::Local, "http://127.0.0.1:1/rpc", "ws://127.0.0.1:1/ws")
            .unwrap();
    let err = client.account_info(&AccountId::from_num(1)).await.unwrap_err();
    assert!(matches!(err, NetworkError::Http(_)));
}

#[tokio::test]
async fn topic_stream_yields_messages_in_order() {
    let (client, _state) = spawn_gateway().await;
    let mut stream = client
        .subscribe_topic(&TopicId::from_num(900), ConsensusTimestamp::EPOCH)
        .await
        .unwrap();

    let first = stream.next().await.unwrap().unwrap();
    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(first.sequence_number, 1);
    assert_eq!(first.contents, b"message 1");
    assert_eq!(second.sequence_number, 2);
}

#[tokio::test]
async fn topic_stream_error_frame_ends_stream() {
    let (client, _state) = spawn_gateway().await;
    let mut stream = client
        .subscribe_topic(&TopicId::from_num(404), ConsensusTimestamp::EPOCH)
        .await
        .unwrap();

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(&err, NetworkError::Stream(msg) if msg == "INVALID_TOPIC_ID"));
    assert!(stream.next().await.is_none());
}
