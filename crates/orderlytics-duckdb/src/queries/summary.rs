use anyhow::Result;

use orderlytics_core::analytics::{DateRange, OrderDateRange, Summary};
use orderlytics_core::error::AnalyticsError;

use crate::queries::{ensure_rows_in_range, range_bounds};
use crate::DuckDbBackend;

impl DuckDbBackend {
    /// Headline metrics for the dashboard's summary cards, computed in one
    /// pass. `avg_review_score` is 0.0 when no row in the range carries a
    /// score (AVG over zero rows is NULL).
    pub async fn summary_inner(&self, range: &DateRange) -> Result<Summary> {
        let conn = self.conn.lock().await;
        ensure_rows_in_range(&conn, range)?;
        let (start, end) = range_bounds(range);

        let mut stmt = conn.prepare(
            r#"
            SELECT
                COUNT(DISTINCT order_id) AS total_orders,
                SUM(payment_value) AS total_revenue,
                SUM(payment_value) AS total_spend,
                SUM(payment_value) / COUNT(DISTINCT CAST(order_approved_at AS DATE)) AS avg_daily_spend,
                COUNT(*) AS total_items,
                AVG(review_score) AS avg_review_score
            FROM orders
            WHERE order_approved_at >= ?1
              AND order_approved_at < ?2
            "#,
        )?;
        let summary = stmt.query_row(duckdb::params![start, end], |row| {
            Ok(Summary {
                total_orders: row.get(0)?,
                total_revenue: row.get(1)?,
                // Revenue and spend are both payment sums over the same rows;
                // the renderer shows them as separate cards.
                total_spend: row.get(2)?,
                avg_daily_spend: row.get(3)?,
                total_items: row.get(4)?,
                avg_review_score: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
            })
        })?;
        Ok(summary)
    }

    /// Dataset-wide min/max of `order_approved_at`; seeds the renderer's
    /// date picker. Ignores any range filter by definition. A dataset with
    /// no approved orders at all reports [`AnalyticsError::EmptyRange`].
    pub async fn order_date_range_inner(&self) -> Result<OrderDateRange> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                CAST(CAST(MIN(order_approved_at) AS DATE) AS VARCHAR),
                CAST(CAST(MAX(order_approved_at) AS DATE) AS VARCHAR)
            FROM orders
            WHERE order_approved_at IS NOT NULL
            "#,
        )?;
        let bounds = stmt.query_row([], |row| {
            let min_date: Option<String> = row.get(0)?;
            let max_date: Option<String> = row.get(1)?;
            Ok((min_date, max_date))
        })?;
        match bounds {
            (Some(min_date), Some(max_date)) => Ok(OrderDateRange { min_date, max_date }),
            _ => Err(AnalyticsError::EmptyRange.into()),
        }
    }
}
