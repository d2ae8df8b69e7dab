//! Shared application state.

use std::sync::Arc;

use hotcoffee_db::Database;

use crate::config::ApiConfig;

/// State handed to every handler.
///
/// Built once at startup; the pool inside [`Database`] is the only shared
/// resource.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Arc<Self> {
        Arc::new(AppState { db, config })
    }
}
