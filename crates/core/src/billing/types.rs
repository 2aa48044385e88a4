//! Domain types for tuition billing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use skolara_shared::types::StudentId;

use super::error::BillingError;

/// A validated billing period (calendar month).
///
/// Construction validates the month up front so downstream computation can
/// rely on the period's first and last day always existing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    month: u8,
    year: i32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl BillingPeriod {
    /// Creates a billing period for the given month and year.
    ///
    /// # Errors
    ///
    /// Returns `BillingError::InvalidPeriod` if `month` is outside 1-12 or
    /// the year is outside the supported calendar range.
    pub fn new(month: u8, year: i32) -> Result<Self, BillingError> {
        let invalid = BillingError::InvalidPeriod { month, year };

        if !(1..=12).contains(&month) {
            return Err(invalid);
        }

        let first_day =
            NaiveDate::from_ymd_opt(year, u32::from(month), 1).ok_or(invalid.clone())?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, u32::from(month) + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or(invalid)?;

        Ok(Self {
            month,
            year,
            first_day,
            last_day,
        })
    }

    /// The billing month (1-12).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// The billing year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// First calendar day of the period.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last calendar day of the period.
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last_day
    }
}

/// A student's enrollment window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentWindow {
    /// Date the student joined.
    pub join_date: NaiveDate,
    /// Date the student left, if any.
    pub end_date: Option<NaiveDate>,
}

impl EnrollmentWindow {
    /// Returns true if the window has any temporal overlap with the period.
    ///
    /// A student who joined after the period's last day, or left before its
    /// first day, is excluded before proration runs.
    #[must_use]
    pub fn overlaps(&self, period: &BillingPeriod) -> bool {
        if self.join_date > period.last_day() {
            return false;
        }
        if let Some(end) = self.end_date {
            if end < period.first_day() {
                return false;
            }
        }
        true
    }

    /// Clamps the window to the period, yielding the chargeable date range.
    #[must_use]
    pub fn clamp_to(&self, period: &BillingPeriod) -> (NaiveDate, NaiveDate) {
        let start = self.join_date.max(period.first_day());
        let end = self
            .end_date
            .map_or(period.last_day(), |end| end.min(period.last_day()));
        (start, end)
    }

    /// Returns true if the window covers the entire period.
    #[must_use]
    pub fn covers(&self, period: &BillingPeriod) -> bool {
        self.join_date <= period.first_day()
            && self.end_date.is_none_or(|end| end >= period.last_day())
    }
}

/// Billing input for one student.
#[derive(Debug, Clone)]
pub struct StudentCharge {
    /// Student being billed.
    pub student_id: StudentId,
    /// Education level code, used to look up the base fee.
    pub level_code: String,
    /// Enrollment window.
    pub window: EnrollmentWindow,
    /// Whether the student is enrolled under a trial arrangement.
    pub is_trial: bool,
}

/// One line on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemDraft {
    /// Stable item key (`tuition`, or the extra fee key).
    pub item_key: String,
    /// Human-readable item name shown on the invoice.
    pub name: String,
    /// Item amount in whole rupiah.
    pub amount: Decimal,
}

/// A fully computed invoice, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceDraft {
    /// Student the invoice belongs to.
    pub student_id: StudentId,
    /// Billing month.
    pub month: u8,
    /// Billing year.
    pub year: i32,
    /// Level code snapshot at generation time.
    pub level_code: String,
    /// Trial flag snapshot at generation time.
    pub is_trial: bool,
    /// Billable days charged.
    pub study_days: u32,
    /// Ordered line items; the tuition line comes first.
    pub items: Vec<InvoiceItemDraft>,
    /// Sum of all item amounts.
    pub total_amount: Decimal,
}

/// Invoice payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Awaiting payment.
    Pending,
    /// Paid; terminal for this engine.
    Paid,
}

/// Outcome of billing one student within a run.
///
/// Skips are normal results, not errors; the run summary reports them
/// per reason instead of silently dropping the student.
#[derive(Debug, Clone)]
pub enum StudentOutcome {
    /// An invoice was computed for the student.
    Billed(InvoiceDraft),
    /// An invoice already exists for this student and period.
    AlreadyBilled,
    /// The enrollment window does not overlap the period at all.
    NoOverlap,
    /// The schedule has no base fee for the student's level.
    NoLevelFee,
    /// The overlap contains no billable days.
    NoBillableDays,
}

/// Per-reason skip counters for a billing run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    /// Students already invoiced for the period.
    pub already_billed: u32,
    /// Students with no temporal overlap.
    pub no_overlap: u32,
    /// Students whose level has no configured fee.
    pub no_level_fee: u32,
    /// Students whose overlap has no billable days.
    pub no_billable_days: u32,
}

impl SkipCounts {
    /// Records a non-billed outcome. `Billed` outcomes are counted by the
    /// caller as creations.
    pub fn record(&mut self, outcome: &StudentOutcome) {
        match outcome {
            StudentOutcome::Billed(_) => {}
            StudentOutcome::AlreadyBilled => self.already_billed += 1,
            StudentOutcome::NoOverlap => self.no_overlap += 1,
            StudentOutcome::NoLevelFee => self.no_level_fee += 1,
            StudentOutcome::NoBillableDays => self.no_billable_days += 1,
        }
    }

    /// Total number of skipped students.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.already_billed + self.no_overlap + self.no_level_fee + self.no_billable_days
    }
}
