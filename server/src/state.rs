use client_core::ClientService;

use crate::config::ServerConfig;

/// Shared router state, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub service: ClientService,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(service: ClientService, config: ServerConfig) -> Self {
        Self { service, config }
    }
}
