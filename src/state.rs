//! Application state for Axum web framework.

use std::sync::Arc;

use crate::repositories::{Repositories, StoreHealth};
use crate::services::Services;

/// Shared handles passed to every handler.
///
/// Cloning is cheap since services and repositories only hold `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Liveness probe of the storage backend behind the services
    pub store: Arc<dyn StoreHealth>,
}

impl AppState {
    pub fn new(repos: Repositories) -> Self {
        let store = repos.health.clone();
        Self {
            services: Services::new(repos),
            store,
        }
    }

    /// State over a fresh process-local store.
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory())
    }
}
