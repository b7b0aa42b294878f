use std::sync::Arc;

use taskboard_core::workflow::TransitionTable;
use taskboard_db::Store;

use crate::config::ServerConfig;
use crate::service::WorkService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend selected at startup.
    pub store: Arc<dyn Store>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Mutation and audit service wrapping `store`.
    pub service: Arc<WorkService>,
}

impl AppState {
    /// Build state around a store with the default transition table.
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        let service = WorkService::new(Arc::clone(&store), TransitionTable::default());
        Self {
            store,
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}
