//! WebSocket support for real-time ticket routing
//!
//! Provides the support desk's real-time layer:
//! - Anonymous users open tickets and follow up on them
//! - A single operator connection sees every open ticket and replies
//! - Tickets close when the user who opened them disconnects
//!
//! # Architecture
//!
//! - **Connection**: A live WebSocket connection and its outbound queue
//! - **Registry**: Live connections and the single operator slot
//! - **Router**: Applies client events to the ticket store and addresses replies
//! - **Handler**: Axum WebSocket route handler
//! - **Events**: Type-safe event definitions for client/server communication

pub mod connection;
pub mod events;
pub mod handler;
pub mod registry;
pub mod router;

pub use handler::ws_handler;
pub use router::{DeskStats, TicketRouter};
