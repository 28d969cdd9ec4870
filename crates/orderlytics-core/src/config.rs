#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    /// Path to the denormalized orders CSV ingested at startup.
    pub orders_csv: String,
    /// Path to the geolocation CSV. Optional at runtime: when the file is
    /// absent the map endpoint serves an empty set and a warning is logged.
    pub geolocation_csv: String,
    pub duckdb_memory_limit: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("ORDERLYTICS_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("ORDERLYTICS_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string()),
            orders_csv: std::env::var("ORDERLYTICS_ORDERS_CSV")
                .unwrap_or_else(|_| "./all_data.csv".to_string()),
            geolocation_csv: std::env::var("ORDERLYTICS_GEOLOCATION_CSV")
                .unwrap_or_else(|_| "./geolocation_dataset.csv".to_string()),
            duckdb_memory_limit: std::env::var("ORDERLYTICS_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
            cors_origins: std::env::var("ORDERLYTICS_CORS_ORIGINS")
                .map(|v| v.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }
}
