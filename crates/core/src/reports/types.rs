//! Recap data types.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::billing::InvoiceStatus;

/// Minimal invoice facts needed for recap aggregation.
#[derive(Debug, Clone)]
pub struct InvoiceSummary {
    /// Billing month (1-12).
    pub month: u8,
    /// Payment status.
    pub status: InvoiceStatus,
    /// Invoice total in whole rupiah.
    pub total_amount: Decimal,
}

/// Paid-vs-pending totals for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyRecap {
    /// Month number (1-12).
    pub month: u8,
    /// Sum of paid invoice totals.
    pub paid_total: Decimal,
    /// Sum of pending invoice totals.
    pub pending_total: Decimal,
    /// Number of paid invoices.
    pub paid_count: u32,
    /// Number of pending invoices.
    pub pending_count: u32,
}

/// Paid-vs-pending recap for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyRecap {
    /// Recap year.
    pub year: i32,
    /// One entry per calendar month, in order.
    pub months: Vec<MonthlyRecap>,
    /// Sum of paid invoice totals across the year.
    pub paid_total: Decimal,
    /// Sum of pending invoice totals across the year.
    pub pending_total: Decimal,
    /// Total number of invoices in the year.
    pub invoice_count: u32,
}
