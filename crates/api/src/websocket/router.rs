//! Ticket routing
//!
//! Turns inbound client events into ticket store mutations and outbound
//! deliveries. The registry and the store share one lock, and deliveries are
//! queued into the target outboxes before it is released, so every
//! connection receives events in commit order. Queueing never blocks; the
//! per-connection writer task does the socket I/O.

use std::sync::Arc;

use deskline_shared::{
    ConnectionId, DeskError, DeskResult, Sender, TicketId, TicketSnapshot, TicketStore,
};
use tokio::sync::{mpsc, Mutex};

use super::connection::Connection;
use super::events::{ClientEvent, ServerEvent};
use super::registry::{ConnectionRegistry, Role};

/// Everything the router mutates, guarded as one unit
#[derive(Debug, Default)]
pub struct DeskState {
    pub registry: ConnectionRegistry,
    pub tickets: TicketStore,
}

/// An event addressed to one connection
#[derive(Debug)]
pub struct Delivery {
    pub target: Arc<Connection>,
    pub event: ServerEvent,
}

impl Delivery {
    fn new(target: Arc<Connection>, event: ServerEvent) -> Self {
        Self { target, event }
    }
}

impl DeskState {
    fn admin_connect(&mut self, caller: ConnectionId) -> DeskResult<Vec<Delivery>> {
        self.registry.register_operator(caller);
        tracing::info!(session_id = %caller, open_tickets = self.tickets.len(), "Operator connected");

        let tickets = self.tickets.all_snapshots();
        Ok(self
            .registry
            .get(&caller)
            .map(|conn| Delivery::new(conn, ServerEvent::ActiveTickets { tickets }))
            .into_iter()
            .collect())
    }

    fn create_ticket(&mut self, caller: ConnectionId, message: &str) -> DeskResult<Vec<Delivery>> {
        let ticket = self.tickets.create(caller, message)?;
        tracing::info!(ticket_id = %ticket.id, session_id = %caller, "Ticket opened");

        let mut deliveries = Vec::with_capacity(2);
        if let Some(creator) = self.registry.get(&caller) {
            deliveries.push(Delivery::new(
                creator,
                ServerEvent::TicketCreated {
                    ticket_id: ticket.id,
                },
            ));
        }
        if let Some(operator) = self.registry.current_operator() {
            deliveries.push(Delivery::new(operator, ServerEvent::NewTicket { ticket }));
        }
        Ok(deliveries)
    }

    fn user_message(
        &mut self,
        caller: ConnectionId,
        ticket_id: TicketId,
        message: String,
    ) -> DeskResult<Vec<Delivery>> {
        if self.tickets.get(&ticket_id).is_none() {
            return Err(DeskError::NotFound(ticket_id));
        }
        if !self.registry.is_owned_by(&self.tickets, &ticket_id, &caller) {
            return Err(DeskError::NotOwner {
                ticket: ticket_id,
                connection: caller,
            });
        }
        self.tickets.append_message(&ticket_id, &message, Sender::User)?;

        Ok(self
            .registry
            .current_operator()
            .map(|operator| Delivery::new(operator, ServerEvent::UserMessage { ticket_id, message }))
            .into_iter()
            .collect())
    }

    fn admin_response(
        &mut self,
        caller: ConnectionId,
        ticket_id: TicketId,
        message: String,
    ) -> DeskResult<Vec<Delivery>> {
        if !self.registry.is_operator(&caller) {
            return Err(DeskError::NotOperator(caller));
        }
        self.tickets.append_message(&ticket_id, &message, Sender::Admin)?;

        match self.registry.owner_of(&self.tickets, &ticket_id) {
            Some(owner) => Ok(vec![Delivery::new(
                owner,
                ServerEvent::AdminResponse { ticket_id, message },
            )]),
            None => {
                tracing::debug!(ticket_id = %ticket_id, "Ticket owner no longer connected");
                Ok(Vec::new())
            }
        }
    }

    fn ping(&self, caller: ConnectionId) -> Vec<Delivery> {
        self.registry
            .get(&caller)
            .map(|conn| Delivery::new(conn, ServerEvent::Pong {}))
            .into_iter()
            .collect()
    }

    fn disconnect(&mut self, caller: ConnectionId) -> Vec<Delivery> {
        let role = self.registry.role_of(&caller);
        self.registry.unregister(&caller);
        if role == Role::Operator {
            self.registry.clear_operator(&caller);
            tracing::info!(session_id = %caller, "Operator disconnected");
        }

        let closed = self.tickets.remove_all_owned_by(&caller);
        match self.registry.current_operator() {
            Some(operator) => closed
                .into_iter()
                .map(|ticket_id| Delivery::new(Arc::clone(&operator), ServerEvent::TicketClosed { ticket_id }))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Point-in-time counters for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeskStats {
    pub connections: usize,
    pub open_tickets: usize,
    pub operator_connected: bool,
}

/// Shared routing service, constructed once and cloned into every connection task
#[derive(Clone, Default)]
pub struct TicketRouter {
    state: Arc<Mutex<DeskState>>,
}

impl TicketRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new transport connection in the user role
    pub async fn connect(&self, sender: mpsc::UnboundedSender<ServerEvent>) -> Arc<Connection> {
        let conn = Arc::new(Connection::new(sender));
        let mut desk = self.state.lock().await;
        desk.registry.register(Arc::clone(&conn));

        tracing::info!(
            session_id = %conn.session_id,
            total_connections = desk.registry.connection_count(),
            "WebSocket connection added"
        );

        conn
    }

    /// Apply one inbound event from `session_id`
    pub async fn handle(&self, session_id: ConnectionId, event: ClientEvent) {
        let kind = event.kind();
        let mut desk = self.state.lock().await;
        let outcome = match event {
            ClientEvent::AdminConnect => desk.admin_connect(session_id),
            ClientEvent::CreateTicket { message } => desk.create_ticket(session_id, &message),
            ClientEvent::UserMessage { ticket_id, message } => {
                desk.user_message(session_id, ticket_id, message)
            }
            ClientEvent::AdminResponse { ticket_id, message } => {
                desk.admin_response(session_id, ticket_id, message)
            }
            ClientEvent::Ping => Ok(desk.ping(session_id)),
        };

        match outcome {
            // Queued under the lock so a later commit cannot overtake these events
            Ok(deliveries) => dispatch(deliveries),
            Err(DeskError::Validation(reason)) => {
                tracing::debug!(session_id = %session_id, event = kind, reason, "Rejected event");
            }
            Err(error) => {
                tracing::warn!(session_id = %session_id, event = kind, error = %error, "Dropped event");
            }
        }
        drop(desk);
    }

    /// Tear down a connection and close the tickets it owned
    pub async fn disconnect(&self, session_id: ConnectionId) {
        let mut desk = self.state.lock().await;
        let deliveries = desk.disconnect(session_id);
        tracing::info!(
            session_id = %session_id,
            closed_notices = deliveries.len(),
            remaining_connections = desk.registry.connection_count(),
            "WebSocket connection removed"
        );
        dispatch(deliveries);
    }

    /// Consistent copy of every open ticket
    pub async fn tickets(&self) -> Vec<TicketSnapshot> {
        self.state.lock().await.tickets.all_snapshots()
    }

    pub async fn stats(&self) -> DeskStats {
        let desk = self.state.lock().await;
        DeskStats {
            connections: desk.registry.connection_count(),
            open_tickets: desk.tickets.len(),
            operator_connected: desk.registry.current_operator().is_some(),
        }
    }
}

/// Hand deliveries to their connections' outboxes
///
/// Callers hold the desk lock. Silently ignores send errors (closed connections are cleaned up by their own disconnect)
fn dispatch(deliveries: Vec<Delivery>) {
    for Delivery { target, event } in deliveries {
        if target.send(event).is_err() {
            tracing::warn!(
                session_id = %target.session_id,
                "Failed to send event to connection (likely closed)"
            );
        }
    }
}
