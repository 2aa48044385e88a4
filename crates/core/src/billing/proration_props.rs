//! Property-based tests for proration and invoice assembly.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use skolara_shared::types::StudentId;

use super::proration::{STANDARD_DAYS_PER_MONTH, round_up_to_thousand, tuition_line};
use super::schedule::{ExtraFee, LevelFee, ResolvedFeeSchedule};
use super::service::BillingService;
use super::types::{BillingPeriod, EnrollmentWindow, StudentCharge, StudentOutcome};

/// Strategy for a base monthly fee (100k .. 10M rupiah).
///
/// Fee schedules are configured in whole thousands, which also keeps the
/// full-month branch a fixed point of the ceiling rounding.
fn base_fee() -> impl Strategy<Value = Decimal> {
    (100i64..10_000i64).prop_map(|thousands| Decimal::from(thousands * 1_000))
}

/// Strategy for a raw amount with a fractional part, as proration produces.
fn raw_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_00i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a discount percentage 0..=100.
fn discount() -> impl Strategy<Value = Decimal> {
    (0i64..=100i64).prop_map(Decimal::from)
}

fn schedule_for(base: Decimal, discount: Decimal, extras: Vec<ExtraFee>) -> ResolvedFeeSchedule {
    ResolvedFeeSchedule {
        month: 7,
        year: 2025,
        level_fees: vec![LevelFee {
            level_code: "sd".to_string(),
            amount: base,
        }],
        extras,
        trial_discount_percent: discount,
    }
}

fn charge(window: EnrollmentWindow, is_trial: bool) -> StudentCharge {
    StudentCharge {
        student_id: StudentId::new(),
        level_code: "sd".to_string(),
        window,
        is_trial,
    }
}

fn july_2025() -> BillingPeriod {
    BillingPeriod::new(7, 2025).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rounding law: the stored amount is `ceil(x / 1000) * 1000` and never
    /// below the raw amount.
    #[test]
    fn prop_rounding_is_ceiling_to_thousand(raw in raw_amount()) {
        let rounded = round_up_to_thousand(raw);

        prop_assert!(rounded >= raw, "rounded {rounded} below raw {raw}");
        prop_assert_eq!(rounded % Decimal::ONE_THOUSAND, Decimal::ZERO);
        prop_assert!(rounded - raw < Decimal::ONE_THOUSAND);
    }

    /// Full-month invariant: a student enrolled before the period start with
    /// no end date is billed exactly the base fee, regardless of the
    /// standard-days arithmetic.
    #[test]
    fn prop_full_month_bills_exactly_base_fee(
        base in base_fee(),
        days_before in 0u64..400u64,
    ) {
        let period = july_2025();
        let window = EnrollmentWindow {
            join_date: period.first_day() - chrono::Duration::days(i64::try_from(days_before).unwrap()),
            end_date: None,
        };
        let schedule = schedule_for(base, Decimal::ZERO, vec![]);

        let outcome = BillingService::bill_student(&charge(window, false), &schedule, &period);

        let StudentOutcome::Billed(draft) = outcome else {
            panic!("full-month student must be billed");
        };
        prop_assert_eq!(draft.items[0].amount, base);
        prop_assert_eq!(draft.total_amount, base);
    }

    /// Exclusion invariant: no temporal overlap means no invoice.
    #[test]
    fn prop_no_overlap_produces_no_invoice(
        base in base_fee(),
        days_after in 1u64..400u64,
    ) {
        let period = july_2025();
        let schedule = schedule_for(base, Decimal::ZERO, vec![]);

        // Joined after the period's last day.
        let late = EnrollmentWindow {
            join_date: period.last_day() + chrono::Duration::days(i64::try_from(days_after).unwrap()),
            end_date: None,
        };
        prop_assert!(matches!(
            BillingService::bill_student(&charge(late, false), &schedule, &period),
            StudentOutcome::NoOverlap
        ));

        // Left before the period's first day.
        let gone = EnrollmentWindow {
            join_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: Some(period.first_day() - chrono::Duration::days(i64::try_from(days_after).unwrap())),
        };
        prop_assert!(matches!(
            BillingService::bill_student(&charge(gone, false), &schedule, &period),
            StudentOutcome::NoOverlap
        ));
    }

    /// Trial math: the pre-rounding amount is
    /// `base / 26 * days * (1 - discount/100)`, and the stored line is that
    /// amount rounded up to the nearest thousand.
    #[test]
    fn prop_trial_math(
        base in base_fee(),
        days in 1u32..=26u32,
        d in discount(),
    ) {
        let line = tuition_line(base, days, false, Some(d));

        let expected_raw = base / Decimal::from(STANDARD_DAYS_PER_MONTH)
            * Decimal::from(days)
            * (Decimal::ONE - d / Decimal::ONE_HUNDRED);
        prop_assert_eq!(line.amount, round_up_to_thousand(expected_raw));
    }

    /// Total consistency: the invoice total equals the exact sum of its item
    /// amounts, with extras at face value.
    #[test]
    fn prop_total_is_sum_of_items(
        base in base_fee(),
        extra_amounts in proptest::collection::vec(1_000i64..1_000_000i64, 0..5),
    ) {
        let extras: Vec<ExtraFee> = extra_amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| ExtraFee {
                fee_key: format!("extra_{i}"),
                name: format!("Biaya tambahan {i}"),
                amount: Decimal::from(*amount),
            })
            .collect();
        let schedule = schedule_for(base, Decimal::ZERO, extras.clone());
        let window = EnrollmentWindow {
            join_date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            end_date: None,
        };

        let outcome = BillingService::bill_student(&charge(window, false), &schedule, &july_2025());
        let StudentOutcome::Billed(draft) = outcome else {
            panic!("student must be billed");
        };

        let item_sum: Decimal = draft.items.iter().map(|item| item.amount).sum();
        prop_assert_eq!(draft.total_amount, item_sum);
        prop_assert_eq!(draft.items.len(), 1 + extras.len());
        for (item, extra) in draft.items.iter().skip(1).zip(&extras) {
            prop_assert_eq!(&item.amount, &extra.amount, "extras are never prorated");
        }
    }
}
