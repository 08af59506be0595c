use std::sync::Arc;

use sqlx::SqlitePool;
use crate::storage::Storage;
use crate::config::Config;

/// Central application state shared across all Axum handlers.
///
/// Built once at startup, before the listener accepts connections.
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool holding the `documents` table.
    pub pool: SqlitePool,

    /// Upload directory the document bytes live in.
    pub storage: Arc<dyn Storage>,

    /// Application configuration loaded from environment variables or `.env`.
    pub config: Config,
}
