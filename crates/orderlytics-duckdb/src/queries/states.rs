use anyhow::Result;

use orderlytics_core::analytics::{DateRange, StateCountRow, StateCustomerCounts};
use orderlytics_core::error::AnalyticsError;

use crate::queries::{ensure_rows_in_range, range_bounds};
use crate::DuckDbBackend;

/// Distinct customers per state, descending. The leading row supplies
/// `most_common_state`; count ties resolve to the lexicographically first
/// state so the answer is deterministic.
pub async fn state_customer_counts_inner(
    db: &DuckDbBackend,
    range: &DateRange,
) -> Result<StateCustomerCounts> {
    let conn = db.conn.lock().await;
    ensure_rows_in_range(&conn, range)?;
    let (start, end) = range_bounds(range);

    let mut stmt = conn.prepare(
        r#"
        SELECT
            customer_state AS state,
            COUNT(DISTINCT customer_id) AS customer_count
        FROM orders
        WHERE order_approved_at >= ?1
          AND order_approved_at < ?2
        GROUP BY state
        ORDER BY customer_count DESC, state ASC NULLS LAST
        "#,
    )?;
    let rows = stmt
        .query_map(duckdb::params![start, end], |row| {
            Ok(StateCountRow {
                state: row.get(0)?,
                customer_count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let most_common_state = rows
        .first()
        .map(|r| r.state.clone())
        .ok_or(AnalyticsError::EmptyRange)?;

    Ok(StateCustomerCounts {
        rows,
        most_common_state,
    })
}
