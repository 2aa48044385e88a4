//! Fee schedule administration routes.
//!
//! Schedules are created or edited before a billing run; invoices snapshot
//! their own amounts, so editing a schedule never changes an issued invoice.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, routes::internal_error};
use skolara_core::billing::{ExtraFee, LevelFee, ResolvedFeeSchedule, validate_schedule};
use skolara_db::repositories::{
    CreateFeeScheduleInput, FeeScheduleError, FeeScheduleRepository, FeeScheduleWithItems,
    UpdateFeeScheduleInput,
};

/// Creates the fee schedule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fee-schedules", get(list_schedules))
        .route("/fee-schedules", post(create_schedule))
        .route("/fee-schedules/{id}", get(get_schedule))
        .route("/fee-schedules/{id}", put(update_schedule))
}

/// Query parameters for schedule listing.
#[derive(Debug, Deserialize)]
pub struct ListSchedulesQuery {
    /// Year to list schedules for.
    pub year: i32,
}

/// One level fee in a request or response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LevelFeeBody {
    /// Education level code.
    pub level_code: String,
    /// Base monthly fee in whole rupiah.
    pub amount: Decimal,
}

/// One extra fee in a request or response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtraFeeBody {
    /// Stable fee key.
    pub fee_key: String,
    /// Fee name shown on invoices.
    pub name: String,
    /// Fee amount in whole rupiah.
    pub amount: Decimal,
}

/// Request body for creating a fee schedule.
#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    /// Billing month (1-12).
    pub month: u8,
    /// Billing year.
    pub year: i32,
    /// Trial discount percentage (0-100).
    #[serde(default)]
    pub trial_discount_percent: Decimal,
    /// Level fees in display order.
    pub level_fees: Vec<LevelFeeBody>,
    /// Extra fees in display order.
    #[serde(default)]
    pub extras: Vec<ExtraFeeBody>,
}

/// Request body for updating a fee schedule. Levels and extras are replaced
/// wholesale when present.
#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    /// New trial discount percentage.
    pub trial_discount_percent: Option<Decimal>,
    /// Replacement level fees.
    pub level_fees: Option<Vec<LevelFeeBody>>,
    /// Replacement extra fees.
    pub extras: Option<Vec<ExtraFeeBody>>,
}

/// Response for a fee schedule.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    /// Schedule ID.
    pub id: Uuid,
    /// Billing month.
    pub month: i16,
    /// Billing year.
    pub year: i32,
    /// Trial discount percentage.
    pub trial_discount_percent: Decimal,
    /// Level fees in configured order.
    pub level_fees: Vec<LevelFeeBody>,
    /// Extra fees in configured order.
    pub extras: Vec<ExtraFeeBody>,
}

fn to_level_fees(body: &[LevelFeeBody]) -> Vec<LevelFee> {
    body.iter()
        .map(|level| LevelFee {
            level_code: level.level_code.clone(),
            amount: level.amount,
        })
        .collect()
}

fn to_extras(body: &[ExtraFeeBody]) -> Vec<ExtraFee> {
    body.iter()
        .map(|extra| ExtraFee {
            fee_key: extra.fee_key.clone(),
            name: extra.name.clone(),
            amount: extra.amount,
        })
        .collect()
}

fn schedule_response(with_items: &FeeScheduleWithItems) -> ScheduleResponse {
    ScheduleResponse {
        id: with_items.schedule.id,
        month: with_items.schedule.month,
        year: with_items.schedule.year,
        trial_discount_percent: with_items.schedule.trial_discount_percent,
        level_fees: with_items
            .levels
            .iter()
            .map(|level| LevelFeeBody {
                level_code: level.level_code.clone(),
                amount: level.amount,
            })
            .collect(),
        extras: with_items
            .extras
            .iter()
            .map(|extra| ExtraFeeBody {
                fee_key: extra.fee_key.clone(),
                name: extra.name.clone(),
                amount: extra.amount,
            })
            .collect(),
    }
}

fn validation_error(err: &skolara_core::billing::ScheduleValidationError) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_schedule",
            "message": err.to_string()
        })),
    )
        .into_response()
}

/// GET `/fee-schedules?year=` - List schedules for a year.
async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ListSchedulesQuery>,
) -> impl IntoResponse {
    let repo = FeeScheduleRepository::new((*state.db).clone());

    match repo.list_by_year(query.year).await {
        Ok(schedules) => {
            let response: Vec<ScheduleResponse> =
                schedules.iter().map(schedule_response).collect();
            (StatusCode::OK, Json(json!({ "fee_schedules": response }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list fee schedules");
            internal_error()
        }
    }
}

/// GET `/fee-schedules/{id}` - Schedule detail.
async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = FeeScheduleRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(Some(with_items)) => {
            (StatusCode::OK, Json(json!(schedule_response(&with_items)))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Fee schedule not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load fee schedule");
            internal_error()
        }
    }
}

/// POST `/fee-schedules` - Create a schedule for a period.
async fn create_schedule(
    State(state): State<AppState>,
    Json(payload): Json<CreateScheduleRequest>,
) -> impl IntoResponse {
    let level_fees = to_level_fees(&payload.level_fees);
    let extras = to_extras(&payload.extras);

    let candidate = ResolvedFeeSchedule {
        month: payload.month,
        year: payload.year,
        level_fees: level_fees.clone(),
        extras: extras.clone(),
        trial_discount_percent: payload.trial_discount_percent,
    };
    if let Err(e) = validate_schedule(&candidate) {
        return validation_error(&e);
    }

    let repo = FeeScheduleRepository::new((*state.db).clone());
    let input = CreateFeeScheduleInput {
        month: payload.month,
        year: payload.year,
        trial_discount_percent: payload.trial_discount_percent,
        level_fees,
        extras,
    };

    match repo.create(input).await {
        Ok(with_items) => {
            info!(
                schedule_id = %with_items.schedule.id,
                month = with_items.schedule.month,
                year = with_items.schedule.year,
                "Fee schedule created"
            );
            (StatusCode::CREATED, Json(json!(schedule_response(&with_items)))).into_response()
        }
        Err(FeeScheduleError::DuplicatePeriod { month, year }) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_period",
                "message": format!("A fee schedule already exists for period {month}/{year}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create fee schedule");
            internal_error()
        }
    }
}

/// PUT `/fee-schedules/{id}` - Update a schedule.
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> impl IntoResponse {
    let repo = FeeScheduleRepository::new((*state.db).clone());

    // Validate the schedule as it would look after the update.
    let existing = match repo.find_by_id(id).await {
        Ok(Some(existing)) => existing,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "Fee schedule not found"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to load fee schedule");
            return internal_error();
        }
    };

    let mut candidate = existing.resolve();
    if let Some(discount) = payload.trial_discount_percent {
        candidate.trial_discount_percent = discount;
    }
    if let Some(level_fees) = &payload.level_fees {
        candidate.level_fees = to_level_fees(level_fees);
    }
    if let Some(extras) = &payload.extras {
        candidate.extras = to_extras(extras);
    }
    if let Err(e) = validate_schedule(&candidate) {
        return validation_error(&e);
    }

    let input = UpdateFeeScheduleInput {
        trial_discount_percent: payload.trial_discount_percent,
        level_fees: payload.level_fees.as_deref().map(to_level_fees),
        extras: payload.extras.as_deref().map(to_extras),
    };

    match repo.update(id, input).await {
        Ok(with_items) => {
            info!(schedule_id = %id, "Fee schedule updated");
            (StatusCode::OK, Json(json!(schedule_response(&with_items)))).into_response()
        }
        Err(FeeScheduleError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Fee schedule not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update fee schedule");
            internal_error()
        }
    }
}
