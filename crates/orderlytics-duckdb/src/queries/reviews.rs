use anyhow::Result;

use orderlytics_core::analytics::{DateRange, ReviewCountRow, ReviewDistribution};
use orderlytics_core::error::AnalyticsError;

use crate::queries::{ensure_rows_in_range, range_bounds};
use crate::DuckDbBackend;

/// Frequency of each distinct review score, descending by count.
///
/// The mode is the first row of that ordering; frequency ties resolve to the
/// lowest score (explicit contract, not a sort accident). Rows without a
/// score are excluded; a range whose rows carry no scores at all reports
/// [`AnalyticsError::EmptyRange`] because the mode is undefined.
pub async fn review_distribution_inner(
    db: &DuckDbBackend,
    range: &DateRange,
) -> Result<ReviewDistribution> {
    let conn = db.conn.lock().await;
    ensure_rows_in_range(&conn, range)?;
    let (start, end) = range_bounds(range);

    let mut stmt = conn.prepare(
        r#"
        SELECT review_score, COUNT(*) AS score_count
        FROM orders
        WHERE order_approved_at >= ?1
          AND order_approved_at < ?2
          AND review_score IS NOT NULL
        GROUP BY review_score
        ORDER BY score_count DESC, review_score ASC
        "#,
    )?;
    let rows = stmt
        .query_map(duckdb::params![start, end], |row| {
            Ok(ReviewCountRow {
                score: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let most_common_score = rows.first().map(|r| r.score).ok_or(AnalyticsError::EmptyRange)?;

    Ok(ReviewDistribution {
        rows,
        most_common_score,
    })
}
