use anyhow::Result;

use orderlytics_core::analytics::{CategorySalesRow, DateRange};

use crate::queries::{ensure_rows_in_range, range_bounds};
use crate::DuckDbBackend;

/// Row count per product category, descending. Lines with a NULL category
/// name are a real key in the data and stay grouped under NULL rather than
/// being dropped or relabelled. Count ties order by category name so the
/// result is deterministic.
pub async fn category_sales_inner(
    db: &DuckDbBackend,
    range: &DateRange,
) -> Result<Vec<CategorySalesRow>> {
    let conn = db.conn.lock().await;
    ensure_rows_in_range(&conn, range)?;
    let (start, end) = range_bounds(range);

    let mut stmt = conn.prepare(
        r#"
        SELECT
            product_category_name_english AS category,
            COUNT(*) AS product_count
        FROM orders
        WHERE order_approved_at >= ?1
          AND order_approved_at < ?2
        GROUP BY category
        ORDER BY product_count DESC, category ASC NULLS LAST
        "#,
    )?;
    let rows = stmt.query_map(duckdb::params![start, end], |row| {
        Ok(CategorySalesRow {
            category: row.get(0)?,
            product_count: row.get(1)?,
        })
    })?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
