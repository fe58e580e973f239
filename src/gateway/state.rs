use std::sync::Arc;
use std::time::Instant;

use crate::service::AccountsService;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountsService>,
    started_at: Instant,
}

impl AppState {
    pub fn new(service: Arc<AccountsService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
