//! Connection registry
//!
//! Tracks every live connection and which one, if any, holds the operator
//! slot. Ticket ownership is recorded on the ticket itself; the registry
//! resolves an owner id to the live connection.

use std::collections::HashMap;
use std::sync::Arc;

use deskline_shared::{ConnectionId, TicketId, TicketStore};

use super::connection::Connection;

/// Role a live connection currently plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Operator,
}

/// Live connections and the single operator slot
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Arc<Connection>>,
    operator: Option<ConnectionId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection in the default user role
    pub fn register(&mut self, conn: Arc<Connection>) {
        self.connections.insert(conn.session_id, conn);
    }

    /// Drop a connection. Leaves the operator slot untouched; see [`Self::clear_operator`].
    pub fn unregister(&mut self, session_id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.remove(session_id)
    }

    /// Get a connection by session ID
    pub fn get(&self, session_id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(session_id).cloned()
    }

    /// Give `session_id` the operator slot, displacing any previous holder
    pub fn register_operator(&mut self, session_id: ConnectionId) -> Option<ConnectionId> {
        let previous = self.operator.replace(session_id);
        if let Some(prev) = previous.filter(|prev| *prev != session_id) {
            tracing::info!(
                previous = %prev,
                operator = %session_id,
                "Operator slot taken over"
            );
        }
        previous
    }

    /// The live operator connection, if the slot is set and not stale
    pub fn current_operator(&self) -> Option<Arc<Connection>> {
        self.operator.and_then(|id| self.get(&id))
    }

    /// Release the operator slot if `session_id` still holds it
    pub fn clear_operator(&mut self, session_id: &ConnectionId) -> bool {
        if self.operator == Some(*session_id) {
            self.operator = None;
            true
        } else {
            false
        }
    }

    pub fn is_operator(&self, session_id: &ConnectionId) -> bool {
        self.operator == Some(*session_id)
    }

    pub fn role_of(&self, session_id: &ConnectionId) -> Role {
        if self.is_operator(session_id) {
            Role::Operator
        } else {
            Role::User
        }
    }

    /// Live connection owning `ticket_id`, if both exist
    pub fn owner_of(&self, tickets: &TicketStore, ticket_id: &TicketId) -> Option<Arc<Connection>> {
        tickets.get(ticket_id).and_then(|t| self.get(&t.owner))
    }

    pub fn is_owned_by(
        &self,
        tickets: &TicketStore,
        ticket_id: &TicketId,
        session_id: &ConnectionId,
    ) -> bool {
        tickets
            .get(ticket_id)
            .is_some_and(|t| t.owner == *session_id && self.connections.contains_key(session_id))
    }

    /// Get total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
