//! Fee schedule resolution and validation.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ScheduleValidationError;

/// Base monthly fee for one education level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFee {
    /// Education level code (e.g. `tk`, `sd`, `smp`).
    pub level_code: String,
    /// Base monthly fee in whole rupiah.
    pub amount: Decimal,
}

/// A flat extra fee applied to every invoice at face value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFee {
    /// Stable fee key (e.g. `activity`, `building`).
    pub fee_key: String,
    /// Human-readable fee name shown on the invoice.
    pub name: String,
    /// Fee amount in whole rupiah; never prorated.
    pub amount: Decimal,
}

/// A fee schedule resolved once per billing run.
///
/// This is an immutable snapshot passed by reference into per-student
/// computation. A schedule edit mid-run can therefore never produce
/// inconsistent invoices within the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFeeSchedule {
    /// Billing month the schedule applies to (1-12).
    pub month: u8,
    /// Billing year the schedule applies to.
    pub year: i32,
    /// Ordered level fees.
    pub level_fees: Vec<LevelFee>,
    /// Ordered extra fees.
    pub extras: Vec<ExtraFee>,
    /// Discount percentage applied to trial students (0-100).
    pub trial_discount_percent: Decimal,
}

impl ResolvedFeeSchedule {
    /// Looks up the base monthly fee for a level.
    ///
    /// `None` means the student is skipped for this run; a missing level is
    /// never fatal to the run as a whole.
    #[must_use]
    pub fn level_fee(&self, level_code: &str) -> Option<Decimal> {
        self.level_fees
            .iter()
            .find(|fee| fee.level_code == level_code)
            .map(|fee| fee.amount)
    }
}

/// Validates an administratively submitted fee schedule before it is stored.
///
/// # Errors
///
/// Returns the first violated rule: month range, duplicate or non-positive
/// level fees, duplicate or non-positive extras, discount outside 0-100.
pub fn validate_schedule(schedule: &ResolvedFeeSchedule) -> Result<(), ScheduleValidationError> {
    if !(1..=12).contains(&schedule.month) {
        return Err(ScheduleValidationError::InvalidMonth(schedule.month));
    }

    let mut seen_levels = HashSet::new();
    for fee in &schedule.level_fees {
        if !seen_levels.insert(fee.level_code.as_str()) {
            return Err(ScheduleValidationError::DuplicateLevel(
                fee.level_code.clone(),
            ));
        }
        if fee.amount <= Decimal::ZERO {
            return Err(ScheduleValidationError::NonPositiveLevelFee(
                fee.level_code.clone(),
            ));
        }
    }

    let mut seen_keys = HashSet::new();
    for extra in &schedule.extras {
        if !seen_keys.insert(extra.fee_key.as_str()) {
            return Err(ScheduleValidationError::DuplicateExtraKey(
                extra.fee_key.clone(),
            ));
        }
        if extra.amount <= Decimal::ZERO {
            return Err(ScheduleValidationError::NonPositiveExtraFee(
                extra.fee_key.clone(),
            ));
        }
    }

    if schedule.trial_discount_percent < Decimal::ZERO
        || schedule.trial_discount_percent > Decimal::ONE_HUNDRED
    {
        return Err(ScheduleValidationError::DiscountOutOfRange(
            schedule.trial_discount_percent,
        ));
    }

    Ok(())
}
