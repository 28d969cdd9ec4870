use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// CORS policy from config: an explicit `ORDERLYTICS_CORS_ORIGINS` allowlist
/// when set, otherwise permissive so the renderer can be served from any
/// origin during development. Origins that fail header-value parsing are
/// skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Middleware is applied in outer-to-inner order (outermost runs first on
/// request, last on response):
///
/// 1. `TraceLayer` — structured request/response logging via `tracing`.
/// 2. `CorsLayer` — see [`cors_layer`].
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/orders/range", get(routes::views::get_order_range))
        .route("/api/views/summary", get(routes::views::get_summary))
        .route("/api/views/daily-orders", get(routes::views::get_daily_orders))
        .route("/api/views/daily-spend", get(routes::views::get_daily_spend))
        .route(
            "/api/views/category-sales",
            get(routes::views::get_category_sales),
        )
        .route(
            "/api/views/review-scores",
            get(routes::views::get_review_scores),
        )
        .route("/api/views/rfm", get(routes::views::get_rfm))
        .route(
            "/api/views/state-customers",
            get(routes::views::get_state_customers),
        )
        .route("/api/geo/points", get(routes::geo::get_geo_points))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
