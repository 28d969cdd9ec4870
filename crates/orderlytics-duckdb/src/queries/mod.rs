//! One module per derived view. Each query filters the `orders` table to the
//! caller's inclusive day range and recomputes from scratch — no caching, no
//! state between calls.

pub mod categories;
pub mod daily;
pub mod reviews;
pub mod rfm;
pub mod states;
pub mod summary;

use anyhow::Result;
use duckdb::Connection;

use orderlytics_core::analytics::DateRange;
use orderlytics_core::error::AnalyticsError;

/// Half-open SQL bounds for an inclusive day range: `[start, end + 1 day)`.
/// DuckDB compares the VARCHAR against TIMESTAMP columns after an implicit
/// cast, so plain `%Y-%m-%d` strings are enough.
pub(crate) fn range_bounds(range: &DateRange) -> (String, String) {
    let start = range.start_date.format("%Y-%m-%d").to_string();
    let end_next = range.end_date + chrono::Duration::days(1);
    (start, end_next.format("%Y-%m-%d").to_string())
}

/// Fail with [`AnalyticsError::EmptyRange`] when the filtered table has zero
/// rows. Every view calls this first so "no data" is an explicit condition,
/// never an empty series or a NaN metric.
pub(crate) fn ensure_rows_in_range(conn: &Connection, range: &DateRange) -> Result<()> {
    let (start, end) = range_bounds(range);
    let count: i64 = conn
        .prepare(
            "SELECT COUNT(*) FROM orders \
             WHERE order_approved_at >= ?1 AND order_approved_at < ?2",
        )?
        .query_row(duckdb::params![start, end], |row| row.get(0))?;
    if count == 0 {
        return Err(AnalyticsError::EmptyRange.into());
    }
    Ok(())
}
