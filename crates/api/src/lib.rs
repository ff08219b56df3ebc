//! Deskline API Library
//!
//! This crate contains the server components for Deskline: the WebSocket
//! ticket router and its small HTTP surface.

pub mod config;
pub mod routes;
pub mod state;
pub mod websocket;

pub use config::Config;
pub use routes::create_router;
pub use state::AppState;
