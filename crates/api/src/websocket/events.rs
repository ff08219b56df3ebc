//! WebSocket event types and serialization
//!
//! Every frame is a JSON text message shaped `{"type": ..., "payload": {...}}`
//! with kebab-case type names and camelCase payload fields.

use deskline_shared::{TicketId, TicketSnapshot};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

// =============================================================================
// Client-to-Server Events
// =============================================================================

/// Events sent from client to server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Claim the operator slot
    AdminConnect,

    /// Open a ticket with its first message
    CreateTicket { message: String },

    /// User follow-up on a ticket it owns
    UserMessage { ticket_id: TicketId, message: String },

    /// Operator reply to a ticket
    AdminResponse { ticket_id: TicketId, message: String },

    /// Heartbeat ping to keep connection alive
    Ping,
}

/// Raw envelope before the payload is interpreted
#[derive(Debug, Deserialize)]
struct Frame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct CreateTicketPayload {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketMessagePayload {
    ticket_id: TicketId,
    message: String,
}

/// Why an inbound frame could not be turned into a [`ClientEvent`]
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("Unknown event type: {0}")]
    UnknownType(String),
    #[error("Invalid payload for {kind}: {source}")]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientEvent {
    /// Parse a text frame received from a peer
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let frame: Frame = serde_json::from_str(text).map_err(FrameError::Malformed)?;

        match frame.kind.as_str() {
            "admin-connect" => Ok(ClientEvent::AdminConnect),
            "ping" => Ok(ClientEvent::Ping),
            "create-ticket" => {
                let p: CreateTicketPayload = payload("create-ticket", frame.payload)?;
                Ok(ClientEvent::CreateTicket { message: p.message })
            }
            "user-message" => {
                let p: TicketMessagePayload = payload("user-message", frame.payload)?;
                Ok(ClientEvent::UserMessage {
                    ticket_id: p.ticket_id,
                    message: p.message,
                })
            }
            "admin-response" => {
                let p: TicketMessagePayload = payload("admin-response", frame.payload)?;
                Ok(ClientEvent::AdminResponse {
                    ticket_id: p.ticket_id,
                    message: p.message,
                })
            }
            _ => Err(FrameError::UnknownType(frame.kind)),
        }
    }

    /// Wire name of the event, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ClientEvent::AdminConnect => "admin-connect",
            ClientEvent::CreateTicket { .. } => "create-ticket",
            ClientEvent::UserMessage { .. } => "user-message",
            ClientEvent::AdminResponse { .. } => "admin-response",
            ClientEvent::Ping => "ping",
        }
    }
}

fn payload<T: DeserializeOwned>(kind: &'static str, value: serde_json::Value) -> Result<T, FrameError> {
    serde_json::from_value(value).map_err(|source| FrameError::InvalidPayload { kind, source })
}

// =============================================================================
// Server-to-Client Events
// =============================================================================

/// Events sent from server to client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Full state sync for a newly registered operator
    ActiveTickets { tickets: Vec<TicketSnapshot> },

    /// A user opened a ticket (operator only)
    NewTicket { ticket: TicketSnapshot },

    /// Acknowledges the creator's ticket
    TicketCreated { ticket_id: TicketId },

    /// User follow-up forwarded to the operator
    UserMessage { ticket_id: TicketId, message: String },

    /// Operator reply forwarded to the owning user
    AdminResponse { ticket_id: TicketId, message: String },

    /// The owning user went away and the ticket is gone
    TicketClosed { ticket_id: TicketId },

    /// Heartbeat response
    Pong {},
}
