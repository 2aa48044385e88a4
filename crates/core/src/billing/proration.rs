//! Tuition proration.
//!
//! Converts a student's billable-day count into the tuition line amount and
//! its human-readable rationale.

use rust_decimal::Decimal;

/// Standard chargeable days per month used for the per-day rate.
///
/// A policy constant, deliberately not derived from the calendar: the per-day
/// rate stays identical across months of different lengths.
pub const STANDARD_DAYS_PER_MONTH: u32 = 26;

/// The computed tuition line for an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuitionLine {
    /// Rounded tuition amount in whole rupiah.
    pub amount: Decimal,
    /// Rationale shown as the invoice item name.
    pub rationale: String,
}

/// Rounds an amount up to the nearest 1,000 rupiah.
///
/// Always a ceiling, never down: rounding must not under-bill.
#[must_use]
pub fn round_up_to_thousand(amount: Decimal) -> Decimal {
    (amount / Decimal::ONE_THOUSAND).ceil() * Decimal::ONE_THOUSAND
}

/// Computes the tuition line for a student.
///
/// Trial students always pay per day with the trial discount applied. Regular
/// students pay the full base fee when their enrollment covers the entire
/// period, and per day otherwise. The result is rounded up to the nearest
/// 1,000 rupiah in every branch.
#[must_use]
pub fn tuition_line(
    base_fee: Decimal,
    study_days: u32,
    covers_full_month: bool,
    trial_discount_percent: Option<Decimal>,
) -> TuitionLine {
    let per_day = base_fee / Decimal::from(STANDARD_DAYS_PER_MONTH);

    let (raw, rationale) = match trial_discount_percent {
        Some(discount) => {
            let factor = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
            (
                per_day * Decimal::from(study_days) * factor,
                format!(
                    "SPP masa percobaan {study_days} hari (diskon {}%)",
                    discount.normalize()
                ),
            )
        }
        None if covers_full_month => (base_fee, "SPP bulanan paket penuh".to_string()),
        None => (
            per_day * Decimal::from(study_days),
            format!("SPP prorata {study_days} hari"),
        ),
    };

    TuitionLine {
        amount: round_up_to_thousand(raw),
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_up_to_thousand() {
        assert_eq!(round_up_to_thousand(dec!(0)), dec!(0));
        assert_eq!(round_up_to_thousand(dec!(1)), dec!(1000));
        assert_eq!(round_up_to_thousand(dec!(999)), dec!(1000));
        assert_eq!(round_up_to_thousand(dec!(1000)), dec!(1000));
        assert_eq!(round_up_to_thousand(dec!(1230769.23)), dec!(1231000));
        assert_eq!(round_up_to_thousand(dec!(192307.69)), dec!(193000));
    }

    #[test]
    fn test_full_month_charges_base_fee() {
        let line = tuition_line(dec!(2000000), 27, true, None);
        assert_eq!(line.amount, dec!(2000000));
        assert_eq!(line.rationale, "SPP bulanan paket penuh");
    }

    #[test]
    fn test_partial_month_prorates_per_day() {
        // 2,000,000 / 26 * 16 = 1,230,769.23... -> 1,231,000
        let line = tuition_line(dec!(2000000), 16, false, None);
        assert_eq!(line.amount, dec!(1231000));
        assert_eq!(line.rationale, "SPP prorata 16 hari");
    }

    #[test]
    fn test_trial_discount_applies_per_day() {
        // 2,000,000 / 26 * 5 * 0.5 = 192,307.69... -> 193,000
        let line = tuition_line(dec!(2000000), 5, false, Some(dec!(50)));
        assert_eq!(line.amount, dec!(193000));
        assert_eq!(line.rationale, "SPP masa percobaan 5 hari (diskon 50%)");
    }

    #[test]
    fn test_trial_ignores_full_month_coverage() {
        // A trial student covering the whole period still pays per day.
        let line = tuition_line(dec!(2600000), 26, true, Some(dec!(0)));
        assert_eq!(line.amount, dec!(2600000));
        assert!(line.rationale.contains("percobaan"));
    }

    #[test]
    fn test_full_discount_yields_zero() {
        let line = tuition_line(dec!(2000000), 10, false, Some(dec!(100)));
        assert_eq!(line.amount, dec!(0));
    }
}
