//! Billing run orchestration.
//!
//! Drives the core billing engine over the active student population for one
//! period: resolve the fee schedule once, then per student apply the
//! idempotency guard, proration, and invoice persistence, staging guardian
//! notifications for a single batch write after the loop.

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait, QueryFilter, QueryOrder,
};
use tracing::{debug, info};

use skolara_core::billing::{
    BillingError, BillingPeriod, BillingService, EnrollmentWindow, SkipCounts, StudentCharge,
    StudentOutcome,
};
use skolara_core::notification::{GuardianContact, InvoiceNotice, fan_out};
use skolara_shared::types::{GuardianId, InvoiceId, StudentId};

use crate::entities::{guardians, sea_orm_active_enums::StudentStatus, students};
use crate::repositories::fee_schedule::{FeeScheduleError, FeeScheduleRepository};
use crate::repositories::invoice::{InvoiceError, InvoiceRepository, InvoiceWithItems};
use crate::repositories::notification::{NotificationError, NotificationRepository};

/// Error types for a billing run.
#[derive(Debug, thiserror::Error)]
pub enum BillingRunError {
    /// Configuration error: invalid period or missing fee schedule. Fatal to
    /// the whole run; no invoices are created.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Fee schedule lookup failed.
    #[error(transparent)]
    Schedule(#[from] FeeScheduleError),

    /// Invoice persistence failed. Already-created invoices stay in place;
    /// the next run's idempotency guard prevents re-billing them.
    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    /// Notification batch persistence failed. Created invoices are not
    /// rolled back.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Summary of one billing run.
#[derive(Debug)]
pub struct RunReport {
    /// Billing month.
    pub month: u8,
    /// Billing year.
    pub year: i32,
    /// Number of invoices created by this run.
    pub created_count: u32,
    /// The created invoices with their items.
    pub invoices: Vec<InvoiceWithItems>,
    /// Per-reason skip counters.
    pub skipped: SkipCounts,
    /// Number of guardian notifications written.
    pub notifications_created: u64,
}

/// Billing run orchestrator.
#[derive(Debug, Clone)]
pub struct BillingRunRepository {
    db: DatabaseConnection,
}

impl BillingRunRepository {
    /// Creates a new billing run repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Generates tuition invoices for one billing period.
    ///
    /// Safely re-runnable: students already invoiced for the period are
    /// skipped before any computation, so a second run creates nothing.
    /// The run is sequential over students with no cross-student locking;
    /// concurrent runs for the same period are the caller's responsibility
    /// to prevent.
    ///
    /// # Errors
    ///
    /// Fails fast with a configuration error when the period is invalid or
    /// has no fee schedule. A persistence failure mid-run propagates and
    /// leaves already-created invoices in place.
    pub async fn generate(&self, month: u8, year: i32) -> Result<RunReport, BillingRunError> {
        let period = BillingPeriod::new(month, year)?;

        let schedule_repo = FeeScheduleRepository::new(self.db.clone());
        let schedule = schedule_repo
            .resolve_period(month, year)
            .await?
            .ok_or(BillingError::ScheduleNotConfigured { month, year })?;

        let invoice_repo = InvoiceRepository::new(self.db.clone());
        let notification_repo = NotificationRepository::new(self.db.clone());

        let roster = students::Entity::find()
            .filter(students::Column::Status.eq(StudentStatus::Active))
            .order_by_asc(students::Column::Name)
            .all(&self.db)
            .await?;
        let roster_size = roster.len();

        let mut invoices = Vec::new();
        let mut skipped = SkipCounts::default();
        let mut staged = Vec::new();

        for student in roster {
            // Idempotency guard before any computation.
            if invoice_repo
                .find_by_student_period(student.id, month, year)
                .await?
                .is_some()
            {
                let outcome = StudentOutcome::AlreadyBilled;
                skipped.record(&outcome);
                debug!(student_id = %student.id, "Student already invoiced for period, skipping");
                continue;
            }

            let charge = StudentCharge {
                student_id: StudentId::from_uuid(student.id),
                level_code: student.level_code.clone(),
                window: EnrollmentWindow {
                    join_date: student.join_date,
                    end_date: student.end_date,
                },
                is_trial: student.is_trial,
            };

            match BillingService::bill_student(&charge, &schedule, &period) {
                StudentOutcome::Billed(draft) => {
                    let created = invoice_repo.create_from_draft(&draft).await?;

                    let contacts: Vec<GuardianContact> = student
                        .find_related(guardians::Entity)
                        .all(&self.db)
                        .await?
                        .into_iter()
                        .map(|guardian| GuardianContact {
                            guardian_id: GuardianId::from_uuid(guardian.id),
                            name: guardian.name,
                        })
                        .collect();

                    let notice = InvoiceNotice {
                        invoice_id: InvoiceId::from_uuid(created.invoice.id),
                        student_name: student.name.clone(),
                        month,
                        year,
                        total_amount: created.invoice.total_amount,
                    };
                    staged.extend(fan_out(&notice, &contacts));

                    debug!(
                        student_id = %student.id,
                        invoice_id = %created.invoice.id,
                        total = %created.invoice.total_amount,
                        "Invoice created"
                    );
                    invoices.push(created);
                }
                outcome => {
                    skipped.record(&outcome);
                    debug!(student_id = %student.id, outcome = ?outcome, "Student skipped");
                }
            }
        }

        // One batch write for the whole run, after the student loop.
        let notifications_created = notification_repo.create_batch(&staged).await?;

        let created_count = u32::try_from(invoices.len()).unwrap_or(u32::MAX);
        info!(
            month,
            year,
            students = roster_size,
            created = created_count,
            skipped = skipped.total(),
            notifications = notifications_created,
            "Billing run complete"
        );

        Ok(RunReport {
            month,
            year,
            created_count,
            invoices,
            skipped,
            notifications_created,
        })
    }
}
