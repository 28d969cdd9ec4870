//! CSV ingestion for the orders and geolocation datasets.
//!
//! Both loaders validate the header row before touching any data row, parse
//! the whole file into typed records, and only then hand the batch to the
//! backend for a single-transaction insert. A file that fails validation
//! leaves the database untouched.

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::info;

use orderlytics_core::error::AnalyticsError;
use orderlytics_core::order::{
    GeoPoint, GeolocationCsvRow, OrderCsvRow, OrderRecord, REQUIRED_GEOLOCATION_COLUMNS,
    REQUIRED_ORDER_COLUMNS,
};

use crate::DuckDbBackend;

/// Parse a timestamp cell the way the source exports write them.
///
/// Accepts `2018-03-01 14:02:55`, the `T`-separated variant, RFC 3339, and a
/// bare `2018-03-01` date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(ts);
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn check_required_columns(
    headers: &csv::StringRecord,
    required: &[&str],
    dataset: &str,
) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(AnalyticsError::MissingColumn {
                dataset: dataset.to_string(),
                column: (*column).to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Load the denormalized orders CSV at `path` into the `orders` table.
///
/// Returns the number of lines ingested. Empty `order_approved_at` cells
/// become NULL (the row is kept but falls outside every date range); a
/// non-empty cell that does not parse aborts the load with
/// [`AnalyticsError::UnparsedTemporal`] so aggregation never sees an
/// unconverted temporal value.
pub async fn load_orders_csv(db: &DuckDbBackend, path: &str) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)?;
    check_required_columns(reader.headers()?, REQUIRED_ORDER_COLUMNS, "orders")?;

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<OrderCsvRow>().enumerate() {
        let row = row?;
        // Header occupies line 1.
        let line = idx as u64 + 2;

        let order_approved_at = match row.order_approved_at.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                AnalyticsError::UnparsedTemporal {
                    column: "order_approved_at".to_string(),
                    value: raw.to_string(),
                    line,
                }
            })?),
        };

        records.push(OrderRecord {
            order_id: row.order_id,
            customer_id: row.customer_id,
            customer_state: row.customer_state,
            product_id: row.product_id,
            product_category_name_english: row.product_category_name_english,
            payment_value: row.payment_value.unwrap_or(0.0),
            order_approved_at,
            // Review scores arrive as floats ("4.0") in the merged export.
            review_score: row.review_score.map(|s| s.round() as i64),
        });
    }

    let count = records.len();
    db.insert_orders(&records).await?;
    info!(path, count, "Orders CSV loaded");
    Ok(count)
}

/// Load the geolocation CSV at `path` into the `geolocation` table.
pub async fn load_geolocation_csv(db: &DuckDbBackend, path: &str) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)?;
    check_required_columns(reader.headers()?, REQUIRED_GEOLOCATION_COLUMNS, "geolocation")?;

    let mut points = Vec::new();
    for row in reader.deserialize::<GeolocationCsvRow>() {
        let row = row?;
        points.push(GeoPoint {
            zip_code_prefix: row.geolocation_zip_code_prefix,
            lat: row.geolocation_lat,
            lng: row.geolocation_lng,
            city: row.geolocation_city,
            state: row.geolocation_state,
        });
    }

    let count = points.len();
    db.insert_geo_points(&points).await?;
    info!(path, count, "Geolocation CSV loaded");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_separated_timestamp() {
        let ts = parse_timestamp("2018-03-01 14:02:55");
        assert_eq!(
            ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()),
            Some("2018-03-01 14:02:55".to_string())
        );
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let ts = parse_timestamp("2018-03-01");
        assert_eq!(
            ts.map(|t| t.format("%H:%M:%S").to_string()),
            Some("00:00:00".to_string())
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("03/01/2018").is_none());
    }
}
