//! Recap generation service.

use rust_decimal::Decimal;

use super::types::{InvoiceSummary, MonthlyRecap, YearlyRecap};
use crate::billing::InvoiceStatus;

/// Service for aggregating tuition recaps.
pub struct RecapService;

impl RecapService {
    /// Aggregates a year of invoice summaries into per-month and yearly
    /// paid-vs-pending totals.
    ///
    /// Every calendar month appears in the result, zeroed when it has no
    /// invoices. Rows whose month falls outside 1-12 are ignored.
    #[must_use]
    pub fn yearly_recap(year: i32, rows: &[InvoiceSummary]) -> YearlyRecap {
        let mut months: Vec<MonthlyRecap> = (1..=12u8)
            .map(|month| MonthlyRecap {
                month,
                ..MonthlyRecap::default()
            })
            .collect();

        for row in rows {
            let Some(entry) = months.get_mut(usize::from(row.month).wrapping_sub(1)) else {
                continue;
            };
            match row.status {
                InvoiceStatus::Paid => {
                    entry.paid_total += row.total_amount;
                    entry.paid_count += 1;
                }
                InvoiceStatus::Pending => {
                    entry.pending_total += row.total_amount;
                    entry.pending_count += 1;
                }
            }
        }

        let paid_total: Decimal = months.iter().map(|m| m.paid_total).sum();
        let pending_total: Decimal = months.iter().map(|m| m.pending_total).sum();
        let invoice_count = months.iter().map(|m| m.paid_count + m.pending_count).sum();

        YearlyRecap {
            year,
            months,
            paid_total,
            pending_total,
            invoice_count,
        }
    }
}
