//! Shared application state

use std::sync::Arc;

use crate::config::Config;
use crate::websocket::TicketRouter;

/// State handed to every axum handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// The single ticket router for this process
    pub router: TicketRouter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            router: TicketRouter::new(),
        }
    }
}
