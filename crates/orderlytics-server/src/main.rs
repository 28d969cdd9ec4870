use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use orderlytics_core::analytics::OrderAnalytics;
use orderlytics_server::state::AppState;

/// `orderlytics health` — liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$ORDERLYTICS_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("ORDERLYTICS_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Health-check subcommand — must be handled before anything else so the
    // binary stays small and fast when used as a Docker HEALTHCHECK probe.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }
    // Initialise structured JSON logging. Level controlled via RUST_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("orderlytics=info".parse()?),
        )
        .json()
        .init();

    let cfg = orderlytics_core::config::Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Ensure data directory exists before opening DuckDB.
    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/orderlytics.db", cfg.data_dir);

    // Open DuckDB — initialises the orders/geolocation schema.
    let db = orderlytics_duckdb::DuckDbBackend::open(&db_path, &cfg.duckdb_memory_limit)?;

    // Ingest the orders CSV once: a populated database file is reused as-is
    // on restart. A missing or malformed orders file is fatal — every view
    // depends on it.
    if db.orders_count().await? == 0 {
        let count = orderlytics_duckdb::loader::load_orders_csv(&db, &cfg.orders_csv).await?;
        info!(path = %cfg.orders_csv, count, "Orders dataset ingested");
    } else {
        info!("Orders table already populated, skipping CSV ingest");
    }

    // The geolocation dataset only feeds the map; a missing file is a
    // warning, not a startup failure.
    if db.geolocation_count().await? == 0 {
        if std::path::Path::new(&cfg.geolocation_csv).exists() {
            let count =
                orderlytics_duckdb::loader::load_geolocation_csv(&db, &cfg.geolocation_csv)
                    .await?;
            info!(path = %cfg.geolocation_csv, count, "Geolocation dataset ingested");
        } else {
            tracing::warn!(
                geolocation_csv = %cfg.geolocation_csv,
                "Geolocation CSV not found. The map endpoint will serve an empty set. \
                 Set ORDERLYTICS_GEOLOCATION_CSV to enable it."
            );
        }
    }

    match db.order_date_range().await {
        Ok(bounds) => info!(
            min_date = %bounds.min_date,
            max_date = %bounds.max_date,
            "Order dataset ready"
        ),
        Err(e) => tracing::warn!(error = %e, "No approved orders in dataset"),
    }

    let state = Arc::new(AppState::new(db, cfg.clone()));

    let addr = format!("0.0.0.0:{}", cfg.port);
    let app = orderlytics_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, "Orderlytics listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
