//! Invoice assembly.

use rust_decimal::Decimal;

use super::proration::TuitionLine;
use super::schedule::ExtraFee;
use super::types::{BillingPeriod, InvoiceDraft, InvoiceItemDraft, StudentCharge};

/// Item key of the tuition line, always the first item on an invoice.
pub const TUITION_ITEM_KEY: &str = "tuition";

/// Assembles an itemized invoice from the tuition line and the schedule's
/// extra fees.
///
/// Extras are applied at face value, never prorated. The total is the exact
/// sum of the item amounts; the tuition line is already rounded and no
/// further rounding happens here. Level, trial flag, and study-day count are
/// stamped onto the invoice for audit purposes.
#[must_use]
pub fn assemble_invoice(
    charge: &StudentCharge,
    period: &BillingPeriod,
    study_days: u32,
    tuition: TuitionLine,
    extras: &[ExtraFee],
) -> InvoiceDraft {
    let mut items = Vec::with_capacity(1 + extras.len());
    items.push(InvoiceItemDraft {
        item_key: TUITION_ITEM_KEY.to_string(),
        name: tuition.rationale,
        amount: tuition.amount,
    });
    items.extend(extras.iter().map(|extra| InvoiceItemDraft {
        item_key: extra.fee_key.clone(),
        name: extra.name.clone(),
        amount: extra.amount,
    }));

    let total_amount: Decimal = items.iter().map(|item| item.amount).sum();

    InvoiceDraft {
        student_id: charge.student_id,
        month: period.month(),
        year: period.year(),
        level_code: charge.level_code.clone(),
        is_trial: charge.is_trial,
        study_days,
        items,
        total_amount,
    }
}
