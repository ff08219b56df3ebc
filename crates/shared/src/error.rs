//! Error types for Deskline

use thiserror::Error;

use crate::ticket::{ConnectionId, TicketId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeskError {
    #[error("Validation error: {0}")]
    Validation(&'static str),

    #[error("Ticket not found: {0}")]
    NotFound(TicketId),

    #[error("Connection {connection} does not own ticket {ticket}")]
    NotOwner {
        ticket: TicketId,
        connection: ConnectionId,
    },

    #[error("Connection {0} is not the operator")]
    NotOperator(ConnectionId),
}

/// Result type alias for desk operations
pub type DeskResult<T> = Result<T, DeskError>;
