use std::sync::Arc;

use orderlytics_core::config::Config;
use orderlytics_duckdb::DuckDbBackend;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// All fields are safe to clone cheaply — the backend already wraps its
/// connection in `Arc<tokio::sync::Mutex<_>>`. After the startup CSV ingest
/// the state is effectively read-only.
pub struct AppState {
    /// The DuckDB backend holding the `orders` and `geolocation` tables.
    pub db: Arc<DuckDbBackend>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DuckDbBackend, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}
