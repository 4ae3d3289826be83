use std::sync::Arc;

use crate::config::Config;
use crate::relay::Relay;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(config: Config, relay: Relay) -> Self {
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
        }
    }
}
