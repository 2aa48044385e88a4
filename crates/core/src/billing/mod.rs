//! Monthly tuition generation logic.
//!
//! This module implements the core billing engine:
//! - Billable-day counting (weekly rest day excluded)
//! - Fee schedule resolution and validation
//! - Tuition proration over a student's enrollment window
//! - Invoice assembly with extra fees
//! - Per-student billing outcomes for the run summary
//! - Payment state transitions

pub mod calendar;
pub mod error;
pub mod invoice;
pub mod payment;
pub mod proration;
pub mod schedule;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

#[cfg(test)]
mod proration_props;

pub use calendar::{WEEKLY_REST_DAY, count_billable_days};
pub use error::{BillingError, ScheduleValidationError};
pub use invoice::{TUITION_ITEM_KEY, assemble_invoice};
pub use payment::{PaymentOutcome, apply_payment};
pub use proration::{STANDARD_DAYS_PER_MONTH, TuitionLine, round_up_to_thousand, tuition_line};
pub use schedule::{ExtraFee, LevelFee, ResolvedFeeSchedule, validate_schedule};
pub use service::BillingService;
pub use types::{
    BillingPeriod, EnrollmentWindow, InvoiceDraft, InvoiceItemDraft, InvoiceStatus, SkipCounts,
    StudentCharge, StudentOutcome,
};
