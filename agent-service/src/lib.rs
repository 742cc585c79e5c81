pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod services;
pub mod startup;

use services::providers::TextProvider;
use services::{AgentDb, AgentRelay};
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub relay: AgentRelay,
}

impl AppState {
    pub fn new(provider: Arc<dyn TextProvider>, store: AgentDb) -> Self {
        Self {
            relay: AgentRelay::new(provider, store),
        }
    }
}
