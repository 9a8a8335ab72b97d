//! Shared application state.

use mongodb::{Client, Database};

/// Cloned into handlers that need the store directly; clones share the
/// driver's connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}
