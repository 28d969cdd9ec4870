use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::AppError, state::AppState};

const DEFAULT_LIMIT: i64 = 10_000;
const MAX_LIMIT: i64 = 100_000;

#[derive(Debug, Deserialize)]
pub struct GeoQuery {
    pub limit: Option<i64>,
}

/// `GET /api/geo/points` — capped geolocation sample for the customer map.
pub async fn get_geo_points(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let points = state.db.geo_points(limit).await.map_err(AppError::from)?;
    Ok(Json(json!({ "data": points })))
}
