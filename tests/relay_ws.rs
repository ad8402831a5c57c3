//! End-to-end relay behavior over real WebSocket connections.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use tofu_relay::api;
use tofu_relay::app_state::AppState;
use tofu_relay::domain::admission::MAX_SESSIONS;
use tofu_relay::persistence::{Stats, StatsStore};
use tofu_relay::service::RelayService;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

async fn spawn_server() -> (SocketAddr, Arc<RelayService>) {
    let relay = Arc::new(RelayService::new(
        StatsStore::with_stats("unused.json", Stats::default()),
        256,
    ));
    let app = Router::new().merge(api::build_router()).with_state(AppState {
        relay: Arc::clone(&relay),
    });

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });
    (addr, relay)
}

async fn connect(addr: SocketAddr) -> Client {
    let Ok((ws, _)) = connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect");
    };
    ws
}

async fn next_json(ws: &mut Client) -> Value {
    loop {
        let Ok(Some(Ok(msg))) = timeout(WAIT, ws.next()).await else {
            panic!("expected a frame");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("frames are JSON");
            };
            return value;
        }
    }
}

async fn send_json(ws: &mut Client, value: Value) {
    if ws.send(Message::text(value.to_string())).await.is_err() {
        panic!("send");
    }
}

fn announcement(text: &str) -> Value {
    json!({"event": "chatMessage", "id": 0, "netName": "[Server]", "message": text})
}

/// Connects and consumes the handshake and own join line.
async fn join(addr: SocketAddr) -> (Client, u64) {
    let mut ws = connect(addr).await;
    let hi = next_json(&mut ws).await;
    assert_eq!(hi.get("event"), Some(&json!("hi")));
    let Some(id) = hi.get("id").and_then(Value::as_u64) else {
        panic!("hi carries an id");
    };
    assert_eq!(next_json(&mut ws).await, announcement(&format!("Anon_{id} has joined")));
    (ws, id)
}

#[tokio::test]
async fn handshake_assigns_increasing_ids() {
    let (addr, _relay) = spawn_server().await;
    let (_a, id_a) = join(addr).await;
    let (_b, id_b) = join(addr).await;
    assert_eq!(id_a, 1);
    assert_eq!(id_b, 2);
}

#[tokio::test]
async fn gameplay_relays_sanitized_and_chat_echoes() {
    let (addr, _relay) = spawn_server().await;
    let (mut a, _) = join(addr).await;
    let (mut b, id_b) = join(addr).await;
    assert_eq!(next_json(&mut a).await, announcement(&format!("Anon_{id_b} has joined")));

    send_json(&mut a, json!({"event": "pos", "pos": {"x": 1, "y": 2}, "foo": "bar"})).await;
    assert_eq!(next_json(&mut b).await, json!({"event": "pos", "pos": {"x": 1, "y": 2}}));

    // The sender never sees its own gameplay frame, so the next thing it
    // reads is its chat echo.
    let chat = json!({"event": "chatMessage", "netName": "Ace", "message": "gg"});
    send_json(&mut a, chat.clone()).await;
    assert_eq!(next_json(&mut a).await, chat);
    assert_eq!(next_json(&mut b).await, chat);
}

#[tokio::test]
async fn departure_uses_last_display_name() {
    let (addr, relay) = spawn_server().await;
    let (mut a, _) = join(addr).await;
    let (mut b, id_b) = join(addr).await;
    assert_eq!(next_json(&mut a).await, announcement(&format!("Anon_{id_b} has joined")));

    send_json(&mut b, json!({"event": "pos", "netName": "Goose"})).await;
    assert_eq!(next_json(&mut a).await, json!({"event": "pos", "netName": "Goose"}));

    let _ = b.close(None).await;
    assert_eq!(next_json(&mut a).await, announcement("Goose has left"));

    let stats = relay.stats().await;
    assert_eq!(stats.current_users, 1);
    assert_eq!(stats.total_users, 2);
}

#[tokio::test]
async fn connection_over_capacity_is_rejected() {
    let (addr, relay) = spawn_server().await;
    let mut clients = Vec::with_capacity(MAX_SESSIONS);
    for _ in 0..MAX_SESSIONS {
        clients.push(join(addr).await);
    }

    let mut extra = connect(addr).await;
    assert_eq!(next_json(&mut extra).await, json!({"event": "serverFull"}));
    match timeout(WAIT, extra.next()).await {
        Ok(Some(Ok(Message::Close(_))) | Some(Err(_)) | None) => {}
        other => panic!("expected the rejected socket to close, got {other:?}"),
    }

    let stats = relay.stats().await;
    assert_eq!(stats.current_users, 50);
    assert_eq!(stats.total_users, 50);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (addr, _relay) = spawn_server().await;
    let Ok(response) = reqwest::get(format!("http://{addr}/health")).await else {
        panic!("health request");
    };
    assert!(response.status().is_success());
    let Ok(body) = response.json::<Value>().await else {
        panic!("health body");
    };
    assert_eq!(body.get("status"), Some(&json!("healthy")));
}
