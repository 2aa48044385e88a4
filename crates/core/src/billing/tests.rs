//! Unit tests for the billing engine.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use skolara_shared::types::StudentId;

use super::error::BillingError;
use super::invoice::TUITION_ITEM_KEY;
use super::schedule::{ExtraFee, LevelFee, ResolvedFeeSchedule};
use super::service::BillingService;
use super::types::{
    BillingPeriod, EnrollmentWindow, SkipCounts, StudentCharge, StudentOutcome,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn july_2025() -> BillingPeriod {
    BillingPeriod::new(7, 2025).unwrap()
}

fn schedule() -> ResolvedFeeSchedule {
    ResolvedFeeSchedule {
        month: 7,
        year: 2025,
        level_fees: vec![LevelFee {
            level_code: "sd".to_string(),
            amount: dec!(2000000),
        }],
        extras: vec![
            ExtraFee {
                fee_key: "activity".to_string(),
                name: "Biaya kegiatan".to_string(),
                amount: dec!(150000),
            },
            ExtraFee {
                fee_key: "catering".to_string(),
                name: "Biaya katering".to_string(),
                amount: dec!(300000),
            },
        ],
        trial_discount_percent: dec!(50),
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

// ============================================================================
// Billing period
// ============================================================================

#[test]
fn test_period_bounds() {
    let period = july_2025();
    assert_eq!(period.first_day(), date(2025, 7, 1));
    assert_eq!(period.last_day(), date(2025, 7, 31));
}

#[test]
fn test_period_december_rolls_year() {
    let period = BillingPeriod::new(12, 2025).unwrap();
    assert_eq!(period.last_day(), date(2025, 12, 31));
}

#[test]
fn test_period_leap_february() {
    let period = BillingPeriod::new(2, 2024).unwrap();
    assert_eq!(period.last_day(), date(2024, 2, 29));
}

#[test]
fn test_invalid_month_rejected() {
    assert_eq!(
        BillingPeriod::new(13, 2025),
        Err(BillingError::InvalidPeriod {
            month: 13,
            year: 2025
        })
    );
    assert!(BillingPeriod::new(0, 2025).is_err());
}

// ============================================================================
// Scenario A: full month at base fee
// ============================================================================

#[test]
fn test_full_month_bills_base_fee() {
    let window = EnrollmentWindow {
        join_date: date(2025, 7, 1),
        end_date: None,
    };

    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());

    let draft = match outcome {
        StudentOutcome::Billed(draft) => draft,
        other => panic!("expected billed outcome, got {other:?}"),
    };
    assert_eq!(draft.items[0].amount, dec!(2000000));
    assert_eq!(draft.items[0].item_key, TUITION_ITEM_KEY);
    assert_eq!(draft.items[0].name, "SPP bulanan paket penuh");
    // Tuition + both extras.
    assert_eq!(draft.items.len(), 3);
    assert_eq!(draft.total_amount, dec!(2450000));
    assert_eq!(draft.level_code, "sd");
    assert!(!draft.is_trial);
    assert_eq!(draft.study_days, 27);
}

#[test]
fn test_enrolled_before_period_is_still_full_month() {
    let window = EnrollmentWindow {
        join_date: date(2024, 1, 15),
        end_date: Some(date(2025, 7, 31)),
    };

    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());

    let draft = match outcome {
        StudentOutcome::Billed(draft) => draft,
        other => panic!("expected billed outcome, got {other:?}"),
    };
    assert_eq!(draft.items[0].amount, dec!(2000000));
}

// ============================================================================
// Scenario B: partial month, prorated and rounded up
// ============================================================================

#[test]
fn test_partial_month_prorates_and_rounds_up() {
    // Joining Jul 14 (Mon) leaves Jul 14..=31: 18 days minus Sundays 20, 27.
    let window = EnrollmentWindow {
        join_date: date(2025, 7, 14),
        end_date: None,
    };

    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());

    let draft = match outcome {
        StudentOutcome::Billed(draft) => draft,
        other => panic!("expected billed outcome, got {other:?}"),
    };
    assert_eq!(draft.study_days, 16);
    // 2,000,000 / 26 * 16 = 1,230,769.23... -> 1,231,000
    assert_eq!(draft.items[0].amount, dec!(1231000));
    assert_eq!(draft.items[0].name, "SPP prorata 16 hari");
    assert_eq!(draft.total_amount, dec!(1231000) + dec!(150000) + dec!(300000));
}

// ============================================================================
// Scenario C: trial student
// ============================================================================

#[test]
fn test_trial_student_discounted_per_day() {
    // Jul 1 (Tue) ..= Jul 5 (Sat): five days, no Sunday.
    let window = EnrollmentWindow {
        join_date: date(2025, 7, 1),
        end_date: Some(date(2025, 7, 5)),
    };

    let outcome = BillingService::bill_student(&charge(window, true), &schedule(), &july_2025());

    let draft = match outcome {
        StudentOutcome::Billed(draft) => draft,
        other => panic!("expected billed outcome, got {other:?}"),
    };
    assert_eq!(draft.study_days, 5);
    // 2,000,000 / 26 * 5 * 0.5 = 192,307.69... -> 193,000
    assert_eq!(draft.items[0].amount, dec!(193000));
    assert!(draft.is_trial);
    assert!(draft.items[0].name.contains("diskon 50%"));
}

// ============================================================================
// Exclusions and skips
// ============================================================================

#[test]
fn test_joined_after_period_is_excluded() {
    let window = EnrollmentWindow {
        join_date: date(2025, 8, 1),
        end_date: None,
    };

    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());
    assert!(matches!(outcome, StudentOutcome::NoOverlap));
}

#[test]
fn test_ended_before_period_is_excluded() {
    let window = EnrollmentWindow {
        join_date: date(2024, 9, 1),
        end_date: Some(date(2025, 6, 30)),
    };

    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());
    assert!(matches!(outcome, StudentOutcome::NoOverlap));
}

#[test]
fn test_missing_level_fee_skips_student() {
    let window = EnrollmentWindow {
        join_date: date(2025, 7, 1),
        end_date: None,
    };
    let mut charge = charge(window, false);
    charge.level_code = "smp".to_string();

    let outcome = BillingService::bill_student(&charge, &schedule(), &july_2025());
    assert!(matches!(outcome, StudentOutcome::NoLevelFee));
}

#[test]
fn test_overlap_of_only_rest_days_skips_student() {
    // Jul 6, 2025 is a Sunday; a one-day overlap on it has no billable days.
    let window = EnrollmentWindow {
        join_date: date(2025, 7, 6),
        end_date: Some(date(2025, 7, 6)),
    };

    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());
    assert!(matches!(outcome, StudentOutcome::NoBillableDays));
}

#[test]
fn test_end_date_inside_period_clamps_window() {
    // Jul 1 (Tue) ..= Jul 12 (Sat): 12 days minus Sunday Jul 6 = 11.
    let window = EnrollmentWindow {
        join_date: date(2025, 6, 1),
        end_date: Some(date(2025, 7, 12)),
    };

    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());

    let draft = match outcome {
        StudentOutcome::Billed(draft) => draft,
        other => panic!("expected billed outcome, got {other:?}"),
    };
    assert_eq!(draft.study_days, 11);
    assert_eq!(draft.items[0].name, "SPP prorata 11 hari");
}

// ============================================================================
// Skip counters
// ============================================================================

#[test]
fn test_skip_counts_record_each_reason() {
    let mut counts = SkipCounts::default();
    counts.record(&StudentOutcome::AlreadyBilled);
    counts.record(&StudentOutcome::AlreadyBilled);
    counts.record(&StudentOutcome::NoOverlap);
    counts.record(&StudentOutcome::NoLevelFee);
    counts.record(&StudentOutcome::NoBillableDays);

    assert_eq!(counts.already_billed, 2);
    assert_eq!(counts.no_overlap, 1);
    assert_eq!(counts.no_level_fee, 1);
    assert_eq!(counts.no_billable_days, 1);
    assert_eq!(counts.total(), 5);
}

#[test]
fn test_billed_outcome_is_not_a_skip() {
    let window = EnrollmentWindow {
        join_date: date(2025, 7, 1),
        end_date: None,
    };
    let outcome = BillingService::bill_student(&charge(window, false), &schedule(), &july_2025());

    let mut counts = SkipCounts::default();
    counts.record(&outcome);
    assert_eq!(counts.total(), 0);
}
