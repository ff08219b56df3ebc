//! End-to-end ticket flow over real WebSocket connections

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::net::SocketAddr;
use std::time::Duration;

use deskline_api::config::{AllowedOrigins, LogFormat};
use deskline_api::{create_router, AppState, Config};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Spawns the app on a random local port
async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new(Config {
        bind_address: addr,
        allowed_origins: AllowedOrigins::Any,
        log_format: LogFormat::Pretty,
    }));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    ws
}

async fn send(ws: &mut Client, frame: Value) {
    ws.send(Message::text(frame.to_string())).await.unwrap();
}

/// Next JSON frame, failing the test after a second of silence
async fn recv(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(1), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .unwrap();
        if msg.is_text() {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

/// Asserts nothing arrives within a short window
async fn assert_silent(ws: &mut Client) {
    let next = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}

async fn admin(addr: SocketAddr) -> (Client, Value) {
    let mut ws = connect(addr).await;
    send(&mut ws, json!({"type": "admin-connect", "payload": {}})).await;
    let snapshot = recv(&mut ws).await;
    assert_eq!(snapshot["type"], "active-tickets");
    (ws, snapshot)
}

#[tokio::test]
async fn test_full_ticket_lifecycle() {
    let addr = spawn_server().await;
    let (mut operator, snapshot) = admin(addr).await;
    assert_eq!(snapshot["payload"]["tickets"], json!([]));

    let mut user = connect(addr).await;
    send(&mut user, json!({"type": "create-ticket", "payload": {"message": "help"}})).await;

    let created = recv(&mut user).await;
    assert_eq!(created["type"], "ticket-created");
    let ticket_id = created["payload"]["ticketId"].as_str().unwrap().to_string();

    let new_ticket = recv(&mut operator).await;
    assert_eq!(new_ticket["type"], "new-ticket");
    assert_eq!(new_ticket["payload"]["ticket"]["id"], ticket_id);
    assert_eq!(
        new_ticket["payload"]["ticket"]["messages"],
        json!([{"text": "help", "sender": "user"}])
    );
    assert!(new_ticket["payload"]["ticket"]["createdAt"].is_string());

    send(
        &mut user,
        json!({"type": "user-message", "payload": {"ticketId": ticket_id, "message": "hello?"}}),
    )
    .await;
    assert_eq!(
        recv(&mut operator).await,
        json!({"type": "user-message", "payload": {"ticketId": ticket_id, "message": "hello?"}})
    );

    send(
        &mut operator,
        json!({"type": "admin-response", "payload": {"ticketId": ticket_id, "message": "hi"}}),
    )
    .await;
    assert_eq!(
        recv(&mut user).await,
        json!({"type": "admin-response", "payload": {"ticketId": ticket_id, "message": "hi"}})
    );

    user.close(None).await.unwrap();
    assert_eq!(
        recv(&mut operator).await,
        json!({"type": "ticket-closed", "payload": {"ticketId": ticket_id}})
    );
}

#[tokio::test]
async fn test_reconnecting_operator_gets_history() {
    let addr = spawn_server().await;

    let mut user = connect(addr).await;
    send(&mut user, json!({"type": "create-ticket", "payload": {"message": "help"}})).await;
    let ticket_id = recv(&mut user).await["payload"]["ticketId"].clone();

    let (mut first, snapshot) = admin(addr).await;
    assert_eq!(snapshot["payload"]["tickets"][0]["id"], ticket_id);

    send(
        &mut first,
        json!({"type": "admin-response", "payload": {"ticketId": ticket_id, "message": "hi"}}),
    )
    .await;
    recv(&mut user).await;
    first.close(None).await.unwrap();

    let (_second, snapshot) = admin(addr).await;
    assert_eq!(
        snapshot["payload"]["tickets"][0]["messages"],
        json!([
            {"text": "help", "sender": "user"},
            {"text": "hi", "sender": "admin"}
        ])
    );
}

#[tokio::test]
async fn test_invalid_frames_are_ignored() {
    let addr = spawn_server().await;
    let (mut operator, _) = admin(addr).await;
    let mut user = connect(addr).await;

    send(&mut user, json!({"type": "create-ticket", "payload": {"message": "   "}})).await;
    send(&mut user, json!({"type": "subscribe", "payload": {}})).await;
    user.send(Message::text("not json")).await.unwrap();
    send(
        &mut user,
        json!({"type": "user-message", "payload": {"ticketId": "00000000-0000-0000-0000-000000000000", "message": "x"}}),
    )
    .await;
    send(
        &mut user,
        json!({"type": "admin-response", "payload": {"ticketId": "00000000-0000-0000-0000-000000000000", "message": "x"}}),
    )
    .await;

    // The connection survives and still answers
    send(&mut user, json!({"type": "ping"})).await;
    assert_eq!(recv(&mut user).await, json!({"type": "pong", "payload": {}}));

    assert_silent(&mut operator).await;
}
