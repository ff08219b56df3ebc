//! Deskline Shared Types and Utilities
//!
//! This crate contains the ticket model, its in-memory store and the error
//! type shared across the Deskline workspace.

pub mod error;
pub mod store;
pub mod ticket;

pub use error::*;
pub use store::TicketStore;
pub use ticket::*;
