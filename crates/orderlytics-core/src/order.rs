use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One raw row of the denormalized orders CSV, exactly as it appears on disk.
/// Timestamps are still strings here; the loader parses them into
/// [`OrderRecord`] and rejects anything unparseable before storage.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCsvRow {
    pub order_id: String,
    pub customer_id: String,
    pub customer_state: Option<String>,
    pub product_id: Option<String>,
    pub product_category_name_english: Option<String>,
    pub payment_value: Option<f64>,
    pub order_approved_at: Option<String>,
    pub review_score: Option<f64>,
}

/// Columns the loader requires in the orders CSV header. Extra columns are
/// ignored; a missing one aborts the load.
pub const REQUIRED_ORDER_COLUMNS: &[&str] = &[
    "order_id",
    "customer_id",
    "customer_state",
    "product_id",
    "product_category_name_english",
    "payment_value",
    "order_approved_at",
    "review_score",
];

/// The typed, stored version of an order line — mirrors the DuckDB `orders`
/// table columns exactly. One row per item/payment line; several rows share
/// an `order_id` and a `customer_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub customer_state: Option<String>,
    pub product_id: Option<String>,
    pub product_category_name_english: Option<String>,
    pub payment_value: f64,
    /// NULL rows are kept in storage but fall outside every date-range
    /// predicate, so they never reach temporal aggregation.
    pub order_approved_at: Option<NaiveDateTime>,
    pub review_score: Option<i64>,
}

/// One raw row of the geolocation CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationCsvRow {
    pub geolocation_zip_code_prefix: Option<String>,
    pub geolocation_lat: f64,
    pub geolocation_lng: f64,
    pub geolocation_city: Option<String>,
    pub geolocation_state: Option<String>,
}

pub const REQUIRED_GEOLOCATION_COLUMNS: &[&str] = &["geolocation_lat", "geolocation_lng"];

/// A stored geolocation point, served verbatim to the renderer's map layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub zip_code_prefix: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub city: Option<String>,
    pub state: Option<String>,
}
