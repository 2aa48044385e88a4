//! Tuition recap routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, routes::internal_error};
use skolara_core::reports::RecapService;
use skolara_db::repositories::InvoiceRepository;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/tuition", get(tuition_recap))
}

/// Query parameters for the yearly recap.
#[derive(Debug, Deserialize)]
pub struct RecapQuery {
    /// Year to aggregate.
    pub year: i32,
}

/// GET `/reports/tuition?year=` - Yearly paid-vs-pending recap.
async fn tuition_recap(
    State(state): State<AppState>,
    Query(query): Query<RecapQuery>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.yearly_summaries(query.year).await {
        Ok(rows) => {
            let recap = RecapService::yearly_recap(query.year, &rows);
            (StatusCode::OK, Json(json!(recap))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load recap rows");
            internal_error()
        }
    }
}
