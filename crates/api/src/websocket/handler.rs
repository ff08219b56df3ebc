//! WebSocket handler for Axum
//!
//! Handles WebSocket connections and feeds their frames to the ticket router.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;

use crate::state::AppState;

use super::{
    events::{ClientEvent, FrameError, ServerEvent},
    router::TicketRouter,
};

/// WebSocket handler - upgrades HTTP connection to WebSocket
///
/// Every peer starts as an anonymous user; the operator identifies itself
/// with an `admin-connect` frame.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    tracing::debug!("WebSocket connection upgrade requested");
    let router = app_state.router.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, router))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, router: TicketRouter) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending events to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let conn = router.connect(tx).await;
    let session_id = conn.session_id;

    // Spawn task to send messages to client
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json)).await.is_err() {
                        break; // Connection closed
                    }
                }
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to serialize WebSocket event");
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(session_id = %session_id, error = ?e, "WebSocket receive error");
                break;
            }
        };

        match msg {
            Message::Text(text) => match ClientEvent::parse(&text) {
                Ok(event) => router.handle(session_id, event).await,
                Err(FrameError::UnknownType(kind)) => {
                    tracing::debug!(session_id = %session_id, kind = %kind, "Ignoring unknown event type");
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "Failed to parse client event"
                    );
                }
            },
            Message::Close(_) => {
                tracing::info!(session_id = %session_id, "WebSocket close frame received");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Axum handles ping/pong automatically
            }
            Message::Binary(_) => {} // Ignore binary messages
        }
    }

    // Cleanup on disconnect
    tracing::info!(
        session_id = %session_id,
        session_secs = conn.session_duration().whole_seconds(),
        "WebSocket connection closing"
    );
    drop(conn);
    router.disconnect(session_id).await;

    send_task.abort();
}
