//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, CounterStore, Database};
use crate::services::Services;

/// Application state shared by every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Use-case services
    pub services: Arc<Services>,
    /// Rate-limit counters
    pub counters: Arc<dyn CounterStore>,
    /// Redis cache (health checks)
    pub cache: Arc<Cache>,
    /// Database connection (health checks)
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire services against live database and Redis connections.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: Config) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            cache.clone(),
            config,
        ));

        Self {
            services,
            counters: cache.clone(),
            cache,
            database,
        }
    }
}
