//! Billing service: per-student tuition computation.
//!
//! This service contains pure business logic with no database dependencies.
//! The orchestrating layer resolves the fee schedule once, checks for an
//! existing invoice, and then calls [`BillingService::bill_student`] per
//! student.

use super::calendar::count_billable_days;
use super::invoice::assemble_invoice;
use super::proration::tuition_line;
use super::schedule::ResolvedFeeSchedule;
use super::types::{BillingPeriod, StudentCharge, StudentOutcome};

/// Billing service for per-student tuition computation.
pub struct BillingService;

impl BillingService {
    /// Computes the billing outcome for one student.
    ///
    /// Steps, in order:
    /// 1. Temporal-overlap exclusion: a student whose enrollment window does
    ///    not touch the period is skipped before any proration.
    /// 2. Level-fee lookup: a level missing from the schedule skips the
    ///    student, never the run.
    /// 3. Billable-day count over the clamped window; zero days is a normal
    ///    skip.
    /// 4. Proration (trial or regular, full or partial month) and invoice
    ///    assembly with the schedule's extra fees.
    ///
    /// The idempotency check against existing invoices belongs to the
    /// orchestrating layer; this function never consults storage.
    #[must_use]
    pub fn bill_student(
        charge: &StudentCharge,
        schedule: &ResolvedFeeSchedule,
        period: &BillingPeriod,
    ) -> StudentOutcome {
        if !charge.window.overlaps(period) {
            return StudentOutcome::NoOverlap;
        }

        let Some(base_fee) = schedule.level_fee(&charge.level_code) else {
            return StudentOutcome::NoLevelFee;
        };

        let (overlap_start, overlap_end) = charge.window.clamp_to(period);
        let study_days = count_billable_days(overlap_start, overlap_end);
        if study_days == 0 {
            return StudentOutcome::NoBillableDays;
        }

        let discount = charge
            .is_trial
            .then_some(schedule.trial_discount_percent);
        let tuition = tuition_line(
            base_fee,
            study_days,
            charge.window.covers(period),
            discount,
        );

        StudentOutcome::Billed(assemble_invoice(
            charge,
            period,
            study_days,
            tuition,
            &schedule.extras,
        ))
    }
}
