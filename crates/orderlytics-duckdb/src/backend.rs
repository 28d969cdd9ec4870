use std::sync::Arc;

use anyhow::Result;
use duckdb::Connection;
use tokio::sync::Mutex;
use tracing::info;

use orderlytics_core::order::{GeoPoint, OrderRecord};

use crate::schema::init_sql;

/// A DuckDB backend for Orderlytics.
///
/// DuckDB is single-writer: concurrent reads are fine, but concurrent writes
/// cause contention. We wrap the connection in `Arc<Mutex<_>>` so the async
/// runtime serialises access while still allowing the struct to be cheaply
/// cloned and shared across Axum handlers. Writes only happen during the
/// startup CSV ingest; after that every query is read-only.
///
/// Memory and thread limits are enforced by [`init_sql`] at open time.
pub struct DuckDbBackend {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl DuckDbBackend {
    /// Open (or create) a DuckDB database file at `path`.
    ///
    /// `memory_limit` is a DuckDB size string such as `"1GB"` or `"512MB"`.
    /// It is read from `Config.duckdb_memory_limit` at the call site.
    /// Runs the schema init SQL so all tables and indexes are created if
    /// they do not already exist.
    pub fn open(path: &str, memory_limit: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(&init_sql(memory_limit))?;
        info!(
            "DuckDB opened at {} with memory_limit={}, threads=2",
            path, memory_limit
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an **in-memory** DuckDB database.
    ///
    /// Intended for unit tests only — data is discarded when the struct is
    /// dropped. Uses a 1GB memory limit (tests are not memory-constrained).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&init_sql("1GB"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a batch of typed order lines in a single transaction.
    ///
    /// Called by the CSV loader after the whole file has parsed cleanly, so
    /// a file that fails validation leaves the table untouched. Returns
    /// immediately (no-op) if `records` is empty.
    pub async fn insert_orders(&self, records: &[OrderRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().await;

        // One transaction for the whole batch: atomicity and one fsync
        // instead of N.
        let tx = conn.transaction()?;
        for record in records {
            tx.execute(
                r#"INSERT INTO orders (
                    order_id, customer_id, customer_state,
                    product_id, product_category_name_english,
                    payment_value, order_approved_at, review_score
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
                duckdb::params![
                    record.order_id,
                    record.customer_id,
                    record.customer_state,
                    record.product_id,
                    record.product_category_name_english,
                    record.payment_value,
                    record
                        .order_approved_at
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
                    record.review_score,
                ],
            )?;
        }
        tx.commit()?;
        tracing::info!("Inserted {} order lines into DuckDB", records.len());
        Ok(())
    }

    /// Insert a batch of geolocation points in a single transaction.
    pub async fn insert_geo_points(&self, points: &[GeoPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        for point in points {
            tx.execute(
                r#"INSERT INTO geolocation (zip_code_prefix, lat, lng, city, state)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
                duckdb::params![
                    point.zip_code_prefix,
                    point.lat,
                    point.lng,
                    point.city,
                    point.state,
                ],
            )?;
        }
        tx.commit()?;
        tracing::info!("Inserted {} geolocation points into DuckDB", points.len());
        Ok(())
    }

    /// Number of rows currently in the `orders` table.
    ///
    /// Used at startup to skip re-ingesting a CSV into an already-populated
    /// database file.
    pub async fn orders_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare("SELECT COUNT(*) FROM orders")?
            .query_row([], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of rows currently in the `geolocation` table.
    pub async fn geolocation_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .prepare("SELECT COUNT(*) FROM geolocation")?
            .query_row([], |row| row.get(0))?;
        Ok(count)
    }

    /// Execute `SELECT 1` as a lightweight liveness check.
    ///
    /// Called by the `/health` endpoint. Returns an error if the connection
    /// is unavailable (file locked, disk full, etc.).
    pub async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("SELECT 1")?;
        Ok(())
    }

    /// Acquire the DuckDB connection lock for direct queries.
    ///
    /// Intended for integration tests that need to verify stored data.
    /// Production code should use the typed methods above.
    pub async fn conn_for_test(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
