//! Notification message rendering and fan-out pairing.

use super::types::{GuardianContact, InvoiceNotice, NotificationDraft};
use skolara_shared::types::format_idr;

/// Indonesian month name for notification text.
///
/// Months outside 1-12 cannot reach this point; the billing period is
/// validated at construction.
#[must_use]
pub fn month_name(month: u8) -> &'static str {
    match month {
        1 => "Januari",
        2 => "Februari",
        3 => "Maret",
        4 => "April",
        5 => "Mei",
        6 => "Juni",
        7 => "Juli",
        8 => "Agustus",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        12 => "Desember",
        _ => "",
    }
}

/// Renders the notification message for one invoice.
#[must_use]
pub fn render_message(notice: &InvoiceNotice) -> String {
    format!(
        "Tagihan SPP {} untuk bulan {} {} sebesar {} telah diterbitkan. Mohon segera melakukan pembayaran.",
        notice.student_name,
        month_name(notice.month),
        notice.year,
        format_idr(notice.total_amount),
    )
}

/// Produces one notification draft per guardian of the invoiced student.
///
/// An invoice for a student without guardians produces no records.
#[must_use]
pub fn fan_out(notice: &InvoiceNotice, guardians: &[GuardianContact]) -> Vec<NotificationDraft> {
    let message = render_message(notice);
    guardians
        .iter()
        .map(|guardian| NotificationDraft {
            invoice_id: notice.invoice_id,
            guardian_id: guardian.guardian_id,
            message: message.clone(),
        })
        .collect()
}
