//! Payment state transitions.
//!
//! The only transition is `pending -> paid`; paid is terminal. There is no
//! refund or void path in this engine.

use super::types::InvoiceStatus;

/// Result of applying a payment to an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The invoice transitions to paid; the caller stamps `paid_at` now.
    Marked,
    /// The invoice was already paid. A distinguishable no-op: the existing
    /// `paid_at` must be left untouched.
    AlreadyPaid,
}

/// Applies a payment action to an invoice's current status.
#[must_use]
pub const fn apply_payment(status: InvoiceStatus) -> PaymentOutcome {
    match status {
        InvoiceStatus::Pending => PaymentOutcome::Marked,
        InvoiceStatus::Paid => PaymentOutcome::AlreadyPaid,
    }
}
