//! services/app/src/ui/state.rs
//!
//! Defines the application's shared state, created once at startup and
//! handed to the controller.

use crate::adapters::{SessionRepository, TicketRepository};
use crate::config::Config;
use std::sync::Arc;
use ticketflow_core::ports::{Clock, KeyValueStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionRepository,
    pub tickets: TicketRepository,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires both repositories onto one store using the configured keys.
    pub fn new(config: Arc<Config>, store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: SessionRepository::new(store.clone(), config.session_key.clone()),
            tickets: TicketRepository::new(store, config.tickets_key.clone()),
            config,
            clock,
        }
    }
}
