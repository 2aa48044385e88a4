//! Billing run routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    routes::internal_error,
    routes::invoices::invoice_with_items_response,
};
use skolara_core::billing::BillingError;
use skolara_db::repositories::{BillingRunError, BillingRunRepository};

/// Creates the billing routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/billing/runs", post(generate_run))
}

/// Request body for a billing run.
#[derive(Debug, Deserialize)]
pub struct GenerateRunRequest {
    /// Billing month (1-12).
    pub month: u8,
    /// Billing year.
    pub year: i32,
}

/// POST `/billing/runs` - Generate tuition invoices for one period.
///
/// Safe to re-trigger: a second run for the same period creates nothing and
/// reports every student as already billed.
async fn generate_run(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRunRequest>,
) -> impl IntoResponse {
    let repo = BillingRunRepository::new((*state.db).clone());

    match repo.generate(payload.month, payload.year).await {
        Ok(report) => {
            info!(
                month = report.month,
                year = report.year,
                created = report.created_count,
                "Billing run triggered via API"
            );

            let invoices: Vec<_> = report
                .invoices
                .iter()
                .map(invoice_with_items_response)
                .collect();

            (
                StatusCode::CREATED,
                Json(json!({
                    "month": report.month,
                    "year": report.year,
                    "created_count": report.created_count,
                    "skipped": report.skipped,
                    "notifications_created": report.notifications_created,
                    "invoices": invoices
                })),
            )
                .into_response()
        }
        Err(BillingRunError::Billing(BillingError::InvalidPeriod { month, year })) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_period",
                "message": format!("{month}/{year} is not a valid billing period")
            })),
        )
            .into_response(),
        Err(BillingRunError::Billing(BillingError::ScheduleNotConfigured { month, year })) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "schedule_not_configured",
                "message": format!("No fee schedule configured for period {month}/{year}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Billing run failed");
            internal_error()
        }
    }
}
