use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use orderlytics_core::analytics::{DateRange, OrderAnalytics};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("{field} must be YYYY-MM-DD")))
}

/// Resolve the caller's date range. Missing bounds fall back to the
/// dataset's full span, matching the dashboard's date picker defaults.
async fn resolve_range(state: &AppState, query: &RangeQuery) -> Result<DateRange, AppError> {
    let (start_date, end_date) = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => (
            parse_date(start, "start_date")?,
            parse_date(end, "end_date")?,
        ),
        _ => {
            let bounds = state.db.order_date_range().await.map_err(AppError::from)?;
            let min = parse_date(&bounds.min_date, "min_date")?;
            let max = parse_date(&bounds.max_date, "max_date")?;
            (
                query
                    .start_date
                    .as_deref()
                    .map(|s| parse_date(s, "start_date"))
                    .transpose()?
                    .unwrap_or(min),
                query
                    .end_date
                    .as_deref()
                    .map(|s| parse_date(s, "end_date"))
                    .transpose()?
                    .unwrap_or(max),
            )
        }
    };

    DateRange::new(start_date, end_date).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// `GET /api/orders/range` — dataset min/max approved-order dates.
pub async fn get_order_range(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let bounds = state.db.order_date_range().await.map_err(AppError::from)?;
    Ok(Json(json!({ "data": bounds })))
}

/// `GET /api/views/summary` — headline metric cards.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&state, &query).await?;
    let result = state.db.summary(&range).await.map_err(AppError::from)?;
    Ok(Json(json!({ "data": result })))
}

/// `GET /api/views/daily-orders` — order count + revenue per day.
pub async fn get_daily_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&state, &query).await?;
    let result = state.db.daily_orders(&range).await.map_err(AppError::from)?;
    Ok(Json(json!({ "data": result })))
}

/// `GET /api/views/daily-spend` — customer spend per day.
pub async fn get_daily_spend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&state, &query).await?;
    let result = state.db.daily_spend(&range).await.map_err(AppError::from)?;
    Ok(Json(json!({ "data": result })))
}

/// `GET /api/views/category-sales` — items sold per product category.
pub async fn get_category_sales(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&state, &query).await?;
    let result = state
        .db
        .category_sales(&range)
        .await
        .map_err(AppError::from)?;
    Ok(Json(json!({ "data": result })))
}

/// `GET /api/views/review-scores` — score frequencies + most common score.
pub async fn get_review_scores(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&state, &query).await?;
    let result = state
        .db
        .review_distribution(&range)
        .await
        .map_err(AppError::from)?;
    Ok(Json(json!({ "data": result })))
}

/// `GET /api/views/rfm` — recency/frequency/monetary per customer.
pub async fn get_rfm(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&state, &query).await?;
    let result = state.db.rfm_table(&range).await.map_err(AppError::from)?;
    Ok(Json(json!({ "data": result })))
}

/// `GET /api/views/state-customers` — distinct customers per state.
pub async fn get_state_customers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&state, &query).await?;
    let result = state
        .db
        .state_customer_counts(&range)
        .await
        .map_err(AppError::from)?;
    Ok(Json(json!({ "data": result })))
}
