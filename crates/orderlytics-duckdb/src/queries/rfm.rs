use anyhow::Result;

use orderlytics_core::analytics::{DateRange, RfmRow};

use crate::queries::{ensure_rows_in_range, range_bounds};
use crate::DuckDbBackend;

/// Recency/Frequency/Monetary per customer, highest spenders first.
///
/// Recency is whole days between the customer's latest approved order and
/// the latest approved order anywhere in the **filtered** range (not the
/// unfiltered dataset), so it is non-negative by construction: the customer
/// maximum can never exceed the global maximum it is measured against.
///
/// Correlated subqueries do not work in DuckDB; the global maximum comes
/// from a CTE joined in once.
pub async fn rfm_table_inner(db: &DuckDbBackend, range: &DateRange) -> Result<Vec<RfmRow>> {
    let conn = db.conn.lock().await;
    ensure_rows_in_range(&conn, range)?;
    let (start, end) = range_bounds(range);

    let mut stmt = conn.prepare(
        r#"
        WITH per_customer AS (
            SELECT
                customer_id,
                COUNT(DISTINCT order_id) AS frequency,
                SUM(payment_value) AS monetary,
                MAX(order_approved_at) AS last_approved
            FROM orders
            WHERE order_approved_at >= ?1
              AND order_approved_at < ?2
            GROUP BY customer_id
        ),
        bounds AS (
            SELECT MAX(order_approved_at) AS global_max
            FROM orders
            WHERE order_approved_at >= ?3
              AND order_approved_at < ?4
        )
        SELECT
            c.customer_id,
            date_diff('day', CAST(c.last_approved AS DATE), CAST(b.global_max AS DATE)) AS recency_days,
            c.frequency,
            c.monetary
        FROM per_customer c
        CROSS JOIN bounds b
        ORDER BY c.monetary DESC, c.customer_id ASC
        "#,
    )?;
    let rows = stmt.query_map(duckdb::params![start, end, start, end], |row| {
        Ok(RfmRow {
            customer_id: row.get(0)?,
            recency_days: row.get(1)?,
            frequency: row.get(2)?,
            monetary: row.get(3)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
