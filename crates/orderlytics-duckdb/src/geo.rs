use anyhow::Result;

use orderlytics_core::order::GeoPoint;

use crate::DuckDbBackend;

impl DuckDbBackend {
    /// A capped slice of geolocation points for the renderer's customer map.
    ///
    /// The source dataset has ~1M rows; the map only needs a sample, so the
    /// caller passes a limit (the route defaults to 10 000). No aggregation —
    /// points are served as stored.
    pub async fn geo_points(&self, limit: i64) -> Result<Vec<GeoPoint>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            r#"
            SELECT zip_code_prefix, lat, lng, city, state
            FROM geolocation
            LIMIT ?1
            "#,
        )?;
        let rows = stmt.query_map(duckdb::params![limit], |row| {
            Ok(GeoPoint {
                zip_code_prefix: row.get(0)?,
                lat: row.get(1)?,
                lng: row.get(2)?,
                city: row.get(3)?,
                state: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
