//! Ticket and message model
//!
//! A ticket is one support conversation between an anonymous user connection
//! and the operator. Its message log is append-only.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Identifier of a ticket, assigned at creation
pub type TicketId = Uuid;

/// Identifier of a live transport connection
pub type ConnectionId = Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Admin,
    /// Presentation-only notices rendered by clients. Never stored, routed
    /// or accepted on the wire.
    #[serde(skip)]
    System,
}

/// A single entry in a ticket's message log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }
}

/// A ticket as held by the store
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub messages: Vec<Message>,
    /// Connection that created the ticket. Relation only; never serialized.
    pub owner: ConnectionId,
    pub created_at: OffsetDateTime,
}

impl Ticket {
    pub fn snapshot(&self) -> TicketSnapshot {
        TicketSnapshot {
            id: self.id,
            messages: self.messages.clone(),
            created_at: self.created_at,
        }
    }
}

/// Point-in-time copy of a ticket, in its wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSnapshot {
    pub id: TicketId,
    pub messages: Vec<Message>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Returns true when `text` has visible content
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_shape() {
        let ticket = Ticket {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            messages: vec![
                Message::new("help", Sender::User),
                Message::new("on it", Sender::Admin),
            ],
            owner: Uuid::new_v4(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_value(ticket.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "messages": [
                    {"text": "help", "sender": "user"},
                    {"text": "on it", "sender": "admin"}
                ],
                "createdAt": "1970-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn test_owner_is_not_serialized() {
        let owner = Uuid::new_v4();
        let ticket = Ticket {
            id: Uuid::new_v4(),
            messages: vec![Message::new("help", Sender::User)],
            owner,
            created_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&ticket.snapshot()).unwrap();
        assert!(!json.contains(&owner.to_string()));
        assert!(!json.contains("owner"));
    }

    #[test]
    fn test_system_sender_stays_off_the_wire() {
        assert!(serde_json::to_string(&Message::new("joined", Sender::System)).is_err());
        assert!(serde_json::from_str::<Sender>("\"system\"").is_err());
        assert_eq!(serde_json::from_str::<Sender>("\"admin\"").unwrap(), Sender::Admin);
    }

    #[test]
    fn test_has_content() {
        assert!(has_content("help"));
        assert!(has_content("  hi  "));
        assert!(!has_content(""));
        assert!(!has_content(" \t\n"));
    }
}
