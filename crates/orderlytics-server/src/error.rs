use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use orderlytics_core::error::AnalyticsError;

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant implements [`IntoResponse`] so Axum handlers can use
/// `Result<impl IntoResponse, AppError>` as their return type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// The filtered table had zero rows — the analytics contract forbids
    /// answering with empty series or NaN metrics.
    #[error("no data in range")]
    NoDataInRange,

    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    /// Lift typed analytics failures out of `anyhow` so they keep their
    /// status codes; everything else is a 500.
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<AnalyticsError>() {
            Some(AnalyticsError::EmptyRange) => AppError::NoDataInRange,
            Some(AnalyticsError::MissingColumn { .. })
            | Some(AnalyticsError::UnparsedTemporal { .. }) => {
                AppError::BadRequest(err.to_string())
            }
            None => AppError::Internal(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::NoDataInRange => (
                StatusCode::NOT_FOUND,
                "no_data_in_range",
                "No data in the requested date range".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "field": null
                }
            })),
        )
            .into_response()
    }
}
