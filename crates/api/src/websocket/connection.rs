//! WebSocket connection handle
//!
//! Represents a live transport connection and its outbound event queue.

use deskline_shared::ConnectionId;
use time::{Duration, OffsetDateTime};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::ServerEvent;

/// Represents an active WebSocket connection
#[derive(Debug)]
pub struct Connection {
    /// Unique session ID for this connection
    pub session_id: ConnectionId,

    /// When the transport accepted the connection
    pub connected_at: OffsetDateTime,

    /// Channel to send events to this connection
    sender: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    /// Create a new connection
    pub fn new(sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            connected_at: OffsetDateTime::now_utc(),
            sender,
        }
    }

    /// Queue an event for this connection
    ///
    /// Returns Ok(()) if queued, Err if the connection's writer has gone away
    #[allow(clippy::result_large_err)] // Error type is from tokio mpsc, containing the failed event
    pub fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event)
    }

    /// How long the connection has been open
    pub fn session_duration(&self) -> Duration {
        OffsetDateTime::now_utc() - self.connected_at
    }
}
