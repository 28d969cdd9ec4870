use anyhow::Result;

use orderlytics_core::analytics::{DailyOrdersRow, DailySpendRow, DateRange};

use crate::queries::{ensure_rows_in_range, range_bounds};
use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Per calendar day of `order_approved_at`: distinct order count and
    /// summed payment value. An order with multiple lines counts once; its
    /// payment lines all contribute to revenue. Days with no qualifying rows
    /// are absent from the series.
    pub async fn daily_orders_inner(&self, range: &DateRange) -> Result<Vec<DailyOrdersRow>> {
        let conn = self.conn.lock().await;
        ensure_rows_in_range(&conn, range)?;
        let (start, end) = range_bounds(range);

        let mut stmt = conn.prepare(
            r#"
            SELECT
                CAST(CAST(order_approved_at AS DATE) AS VARCHAR) AS day,
                COUNT(DISTINCT order_id) AS order_count,
                SUM(payment_value) AS revenue
            FROM orders
            WHERE order_approved_at >= ?1
              AND order_approved_at < ?2
            GROUP BY day
            ORDER BY day
            "#,
        )?;
        let rows = stmt.query_map(duckdb::params![start, end], |row| {
            Ok(DailyOrdersRow {
                day: row.get(0)?,
                order_count: row.get(1)?,
                revenue: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Per calendar day: summed payment value. Same grouping key as
    /// [`Self::daily_orders_inner`], kept as a separate view because the
    /// dashboard charts them independently.
    pub async fn daily_spend_inner(&self, range: &DateRange) -> Result<Vec<DailySpendRow>> {
        let conn = self.conn.lock().await;
        ensure_rows_in_range(&conn, range)?;
        let (start, end) = range_bounds(range);

        let mut stmt = conn.prepare(
            r#"
            SELECT
                CAST(CAST(order_approved_at AS DATE) AS VARCHAR) AS day,
                SUM(payment_value) AS total_spend
            FROM orders
            WHERE order_approved_at >= ?1
              AND order_approved_at < ?2
            GROUP BY day
            ORDER BY day
            "#,
        )?;
        let rows = stmt.query_map(duckdb::params![start, end], |row| {
            Ok(DailySpendRow {
                day: row.get(0)?,
                total_spend: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
