//! Application state for API handlers

use std::sync::Arc;

use graphgate_core::{DirectoryClientFactory, DirectoryConfig, SecretProvider};

use crate::service::DirectoryService;

/// Shared, immutable handler state
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryService>,
}

impl AppState {
    pub fn new(
        config: DirectoryConfig,
        secrets: Arc<dyn SecretProvider>,
        clients: Arc<dyn DirectoryClientFactory>,
    ) -> Self {
        Self {
            directory: Arc::new(DirectoryService::new(config, secrets, clients)),
        }
    }
}
