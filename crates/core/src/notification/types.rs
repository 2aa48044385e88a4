//! Notification domain types.

use rust_decimal::Decimal;
use serde::Serialize;
use skolara_shared::types::{GuardianId, InvoiceId};

/// A guardian eligible to receive invoice notifications.
#[derive(Debug, Clone)]
pub struct GuardianContact {
    /// Guardian ID.
    pub guardian_id: GuardianId,
    /// Guardian display name.
    pub name: String,
}

/// The facts of a freshly created invoice needed to notify guardians.
#[derive(Debug, Clone)]
pub struct InvoiceNotice {
    /// The persisted invoice.
    pub invoice_id: InvoiceId,
    /// Student display name.
    pub student_name: String,
    /// Billing month (1-12).
    pub month: u8,
    /// Billing year.
    pub year: i32,
    /// Invoice total in whole rupiah.
    pub total_amount: Decimal,
}

/// A notification record ready to persist. Starts unread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDraft {
    /// Invoice the notification refers to.
    pub invoice_id: InvoiceId,
    /// Guardian being notified.
    pub guardian_id: GuardianId,
    /// Rendered message text.
    pub message: String,
}
