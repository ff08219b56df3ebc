//! In-memory ticket store
//!
//! Authoritative collection of open tickets. The store itself is not
//! synchronized; callers hold it behind the same lock as the connection
//! registry so every mutation is serialized.

use std::collections::HashMap;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{DeskError, DeskResult};
use crate::ticket::{has_content, ConnectionId, Message, Sender, Ticket, TicketId, TicketSnapshot};

/// Open tickets indexed by id
#[derive(Debug, Default)]
pub struct TicketStore {
    tickets: HashMap<TicketId, Ticket>,
}

impl TicketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a ticket owned by `owner` whose log starts with `first_text`
    pub fn create(&mut self, owner: ConnectionId, first_text: &str) -> DeskResult<TicketSnapshot> {
        if !has_content(first_text) {
            return Err(DeskError::Validation("message text must not be empty"));
        }

        let id = self.fresh_id();
        let ticket = Ticket {
            id,
            messages: vec![Message::new(first_text, Sender::User)],
            owner,
            created_at: OffsetDateTime::now_utc(),
        };
        let snapshot = ticket.snapshot();
        self.tickets.insert(id, ticket);

        tracing::debug!(
            ticket_id = %id,
            owner = %owner,
            open_tickets = self.tickets.len(),
            "Ticket created"
        );

        Ok(snapshot)
    }

    /// Append a message to an existing ticket and return the updated snapshot
    pub fn append_message(
        &mut self,
        ticket_id: &TicketId,
        text: &str,
        sender: Sender,
    ) -> DeskResult<TicketSnapshot> {
        if !has_content(text) {
            return Err(DeskError::Validation("message text must not be empty"));
        }

        let ticket = self
            .tickets
            .get_mut(ticket_id)
            .ok_or(DeskError::NotFound(*ticket_id))?;
        ticket.messages.push(Message::new(text, sender));

        Ok(ticket.snapshot())
    }

    /// Delete a ticket. Absent ids are ignored.
    pub fn remove(&mut self, ticket_id: &TicketId) -> Option<Ticket> {
        self.tickets.remove(ticket_id)
    }

    /// Delete every ticket owned by `owner`, returning the removed ids
    pub fn remove_all_owned_by(&mut self, owner: &ConnectionId) -> Vec<TicketId> {
        let mut removed: Vec<&Ticket> = self
            .tickets
            .values()
            .filter(|t| t.owner == *owner)
            .collect();
        removed.sort_by_key(|t| (t.created_at, t.id));
        let removed: Vec<TicketId> = removed.into_iter().map(|t| t.id).collect();

        for id in &removed {
            self.tickets.remove(id);
        }

        if !removed.is_empty() {
            tracing::debug!(
                owner = %owner,
                removed = removed.len(),
                open_tickets = self.tickets.len(),
                "Removed tickets of departed owner"
            );
        }

        removed
    }

    /// Snapshots of every open ticket, oldest first
    pub fn all_snapshots(&self) -> Vec<TicketSnapshot> {
        let mut tickets: Vec<&Ticket> = self.tickets.values().collect();
        tickets.sort_by_key(|t| (t.created_at, t.id));
        tickets.into_iter().map(Ticket::snapshot).collect()
    }

    /// Look up a ticket
    pub fn get(&self, ticket_id: &TicketId) -> Option<&Ticket> {
        self.tickets.get(ticket_id)
    }

    /// Number of open tickets
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    fn fresh_id(&self) -> TicketId {
        loop {
            let id = Uuid::new_v4();
            if !self.tickets.contains_key(&id) {
                return id;
            }
        }
    }
}
