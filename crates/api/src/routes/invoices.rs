//! Invoice read, export, and payment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, routes::internal_error};
use skolara_db::entities::{invoices, sea_orm_active_enums::InvoiceStatus};
use skolara_db::repositories::{InvoiceError, InvoiceFilter, InvoiceRepository, InvoiceWithItems};
use skolara_shared::types::{PageRequest, PageResponse};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices/export", get(export_invoices))
        .route("/invoices/{id}", get(get_invoice))
        .route("/invoices/{id}/pay", post(pay_invoice))
}

/// Query parameters for invoice listing.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Billing month filter.
    pub month: Option<u8>,
    /// Billing year filter.
    pub year: Option<i32>,
    /// Payment status filter (`pending` or `paid`).
    pub status: Option<String>,
    /// Student filter.
    pub student_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Query parameters for the period export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Billing month.
    pub month: u8,
    /// Billing year.
    pub year: i32,
}

/// Response for one invoice line item.
#[derive(Debug, Serialize)]
pub struct InvoiceItemResponse {
    /// Stable item key.
    pub item_key: String,
    /// Item name.
    pub name: String,
    /// Item amount in whole rupiah.
    pub amount: Decimal,
}

/// Response for an invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Student the invoice belongs to.
    pub student_id: Uuid,
    /// Billing month.
    pub month: i16,
    /// Billing year.
    pub year: i32,
    /// Level code snapshot.
    pub level_code: String,
    /// Trial flag snapshot.
    pub is_trial: bool,
    /// Billable days charged.
    pub study_days: i32,
    /// Invoice total in whole rupiah.
    pub total_amount: Decimal,
    /// Payment status.
    pub status: String,
    /// Payment timestamp, if paid.
    pub paid_at: Option<DateTime<FixedOffset>>,
    /// Line items; omitted in list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InvoiceItemResponse>>,
}

pub(crate) fn status_to_string(status: &InvoiceStatus) -> String {
    match status {
        InvoiceStatus::Pending => "pending".to_string(),
        InvoiceStatus::Paid => "paid".to_string(),
    }
}

pub(crate) fn string_to_status(s: &str) -> Option<InvoiceStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(InvoiceStatus::Pending),
        "paid" => Some(InvoiceStatus::Paid),
        _ => None,
    }
}

pub(crate) fn invoice_response(invoice: &invoices::Model) -> InvoiceResponse {
    InvoiceResponse {
        id: invoice.id,
        student_id: invoice.student_id,
        month: invoice.month,
        year: invoice.year,
        level_code: invoice.level_code.clone(),
        is_trial: invoice.is_trial,
        study_days: invoice.study_days,
        total_amount: invoice.total_amount,
        status: status_to_string(&invoice.status),
        paid_at: invoice.paid_at,
        items: None,
    }
}

pub(crate) fn invoice_with_items_response(with_items: &InvoiceWithItems) -> InvoiceResponse {
    let mut response = invoice_response(&with_items.invoice);
    response.items = Some(
        with_items
            .items
            .iter()
            .map(|item| InvoiceItemResponse {
                item_key: item.item_key.clone(),
                name: item.name.clone(),
                amount: item.amount,
            })
            .collect(),
    );
    response
}

/// GET `/invoices` - List invoices with filters and pagination.
async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match string_to_status(raw) {
            Some(status) => Some(status),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Status must be one of: pending, paid"
                    })),
                )
                    .into_response();
            }
        },
    };

    let filter = InvoiceFilter {
        month: query.month,
        year: query.year,
        status,
        student_id: query.student_id,
    };
    let page = PageRequest {
        page: query.page.unwrap_or_else(|| PageRequest::default().page),
        per_page: query.per_page.unwrap_or_else(|| PageRequest::default().per_page),
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    match repo.list(&filter, &page).await {
        Ok((rows, total)) => {
            let items: Vec<InvoiceResponse> = rows.iter().map(invoice_response).collect();
            let response = PageResponse::new(items, &page, total);
            (StatusCode::OK, Json(json!(response))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list invoices");
            internal_error()
        }
    }
}

/// GET `/invoices/{id}` - Invoice detail with line items.
async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.find_with_items(id).await {
        Ok(Some(with_items)) => {
            (StatusCode::OK, Json(json!(invoice_with_items_response(&with_items))))
                .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Invoice not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load invoice");
            internal_error()
        }
    }
}

/// POST `/invoices/{id}/pay` - Mark an invoice paid.
///
/// Paying an already-paid invoice is a no-op; the response flags it and the
/// stored payment timestamp is untouched.
async fn pay_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.mark_paid(id).await {
        Ok(receipt) => {
            if !receipt.already_paid {
                info!(invoice_id = %id, "Invoice marked paid");
            }
            (
                StatusCode::OK,
                Json(json!({
                    "id": receipt.invoice.id,
                    "status": status_to_string(&receipt.invoice.status),
                    "paid_at": receipt.invoice.paid_at,
                    "already_paid": receipt.already_paid
                })),
            )
                .into_response()
        }
        Err(InvoiceError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Invoice not found"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to mark invoice paid");
            internal_error()
        }
    }
}

/// One CSV row of the period export.
#[derive(Debug, Serialize)]
struct ExportRow {
    invoice_id: Uuid,
    student_name: String,
    level_code: String,
    is_trial: bool,
    study_days: i32,
    total_amount: Decimal,
    status: String,
    paid_at: String,
}

/// GET `/invoices/export` - CSV export of a billing period.
async fn export_invoices(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    let rows = match repo.export_rows(query.month, query.year).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to load export rows");
            return internal_error();
        }
    };

    let mut writer = csv::Writer::from_writer(vec![]);
    for row in &rows {
        let record = ExportRow {
            invoice_id: row.invoice.id,
            student_name: row.student_name.clone(),
            level_code: row.invoice.level_code.clone(),
            is_trial: row.invoice.is_trial,
            study_days: row.invoice.study_days,
            total_amount: row.invoice.total_amount,
            status: status_to_string(&row.invoice.status),
            paid_at: row
                .invoice
                .paid_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        };
        if let Err(e) = writer.serialize(record) {
            error!(error = %e, "Failed to serialize export row");
            return internal_error();
        }
    }

    let bytes = match writer.into_inner() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Failed to finish export");
            return internal_error();
        }
    };

    let filename = format!(
        "attachment; filename=\"invoices-{}-{:02}.csv\"",
        query.year, query.month
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        bytes,
    )
        .into_response()
}
