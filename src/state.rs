use crate::broadcast::Router;
use crate::config::RelayConfig;
use crate::registry::Registry;
use std::sync::Arc;

/// Shared application state, handed to every connection task by `Arc`
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub router: Router,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config: Arc::new(config),
            router: Router::new(Arc::new(Registry::new())),
        }
    }

    pub async fn participant_count(&self) -> usize {
        self.router.count().await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RelayConfig::default())
    }
}
