//! API route definitions.

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::AppState;
use skolara_shared::AppError;

pub mod billing;
pub mod fee_schedules;
pub mod health;
pub mod invoices;
pub mod reports;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(billing::routes())
        .merge(invoices::routes())
        .merge(fee_schedules::routes())
        .merge(reports::routes())
}

/// Renders an application error as a JSON envelope.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code().to_lowercase(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

/// Standard 500 envelope for unexpected failures.
pub(crate) fn internal_error() -> Response {
    error_response(&AppError::Internal("An error occurred".to_string()))
}
