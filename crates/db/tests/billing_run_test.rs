//! Integration tests for the billing run orchestrator.
//!
//! These tests need a PostgreSQL instance; they skip themselves when
//! `DATABASE_URL` is not set. Migrations are applied on first connect.
//! Each test bills a unique far-future period and gives its students
//! enrollment windows inside that period only, so tests never see each
//! other's data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use skolara_core::billing::{BillingError, ExtraFee, LevelFee};
use skolara_db::entities::{guardians, sea_orm_active_enums::StudentStatus, students};
use skolara_db::migration::Migrator;
use skolara_db::repositories::{
    BillingRunError, BillingRunRepository, CreateFeeScheduleInput, FeeScheduleError,
    FeeScheduleRepository, InvoiceRepository, NotificationRepository,
};

static MIGRATED: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

async fn test_db() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return None;
    };
    let db = skolara_db::connect(&url).await.expect("connect to database");
    // Tests run concurrently; apply migrations exactly once per process.
    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.expect("run migrations");
        })
        .await;
    Some(db)
}

/// A year unlikely to collide across tests and runs.
fn unique_year(base: i32) -> i32 {
    let salt = i32::try_from(Uuid::new_v4().as_u128() % 900).unwrap();
    base + salt
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_schedule(db: &DatabaseConnection, month: u8, year: i32) {
    let repo = FeeScheduleRepository::new(db.clone());
    repo.create(CreateFeeScheduleInput {
        month,
        year,
        trial_discount_percent: dec!(50),
        level_fees: vec![LevelFee {
            level_code: "sd".to_string(),
            amount: dec!(2000000),
        }],
        extras: vec![ExtraFee {
            fee_key: "activity".to_string(),
            name: "Biaya kegiatan".to_string(),
            amount: dec!(150000),
        }],
    })
    .await
    .expect("seed fee schedule");
}

struct SeedStudent {
    join_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_trial: bool,
    guardian_count: usize,
}

async fn seed_student(db: &DatabaseConnection, seed: SeedStudent) -> students::Model {
    let now = chrono::Utc::now().into();
    let student = students::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Budi Santoso".to_string()),
        level_code: Set("sd".to_string()),
        join_date: Set(seed.join_date),
        end_date: Set(seed.end_date),
        is_trial: Set(seed.is_trial),
        status: Set(StudentStatus::Active),
        class_group_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("seed student");

    for i in 0..seed.guardian_count {
        guardians::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(student.id),
            name: Set(format!("Wali {i}")),
            phone: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .expect("seed guardian");
    }

    student
}

// ============================================================================
// Idempotence: a second run for the same period creates nothing
// ============================================================================
#[tokio::test]
async fn test_generate_twice_creates_once() {
    let Some(db) = test_db().await else { return };
    let year = unique_year(3000);
    seed_schedule(&db, 7, year).await;
    let student = seed_student(
        &db,
        SeedStudent {
            join_date: date(year, 7, 1),
            end_date: Some(date(year, 7, 31)),
            is_trial: false,
            guardian_count: 1,
        },
    )
    .await;

    let runs = BillingRunRepository::new(db.clone());

    let first = runs.generate(7, year).await.expect("first run");
    assert_eq!(first.created_count, 1);
    assert_eq!(first.invoices.len(), 1);

    let invoice_repo = InvoiceRepository::new(db.clone());
    let stored = invoice_repo
        .find_by_student_period(student.id, 7, year)
        .await
        .expect("lookup")
        .expect("invoice exists after first run");

    let second = runs.generate(7, year).await.expect("second run");
    assert_eq!(second.created_count, 0);
    assert_eq!(second.skipped.already_billed, 1);
    assert_eq!(second.notifications_created, 0);

    // The original invoice is untouched.
    let still_stored = invoice_repo
        .find_by_student_period(student.id, 7, year)
        .await
        .expect("lookup")
        .expect("invoice still exists");
    assert_eq!(still_stored.id, stored.id);
    assert_eq!(still_stored.total_amount, stored.total_amount);
}

// ============================================================================
// Configuration error: missing schedule aborts before any student
// ============================================================================
#[tokio::test]
async fn test_missing_schedule_aborts_run() {
    let Some(db) = test_db().await else { return };
    let year = unique_year(4000);
    seed_student(
        &db,
        SeedStudent {
            join_date: date(year, 7, 1),
            end_date: Some(date(year, 7, 31)),
            is_trial: false,
            guardian_count: 1,
        },
    )
    .await;

    let runs = BillingRunRepository::new(db.clone());
    let result = runs.generate(7, year).await;

    assert!(matches!(
        result,
        Err(BillingRunError::Billing(
            BillingError::ScheduleNotConfigured { .. }
        ))
    ));
}

#[tokio::test]
async fn test_invalid_month_rejected() {
    let Some(db) = test_db().await else { return };

    let runs = BillingRunRepository::new(db.clone());
    let result = runs.generate(13, unique_year(4000)).await;

    assert!(matches!(
        result,
        Err(BillingRunError::Billing(BillingError::InvalidPeriod { .. }))
    ));
}

// ============================================================================
// Persisted proration: partial month stored with rounded tuition line
// ============================================================================
#[tokio::test]
async fn test_partial_month_invoice_persisted() {
    let Some(db) = test_db().await else { return };
    let year = unique_year(5000);
    seed_schedule(&db, 7, year).await;
    let student = seed_student(
        &db,
        SeedStudent {
            // Overlap from the 14th to month end.
            join_date: date(year, 7, 14),
            end_date: Some(date(year, 7, 31)),
            is_trial: false,
            guardian_count: 0,
        },
    )
    .await;

    let runs = BillingRunRepository::new(db.clone());
    let report = runs.generate(7, year).await.expect("run");
    assert_eq!(report.created_count, 1);

    let invoice_repo = InvoiceRepository::new(db.clone());
    let stored = invoice_repo
        .find_by_student_period(student.id, 7, year)
        .await
        .expect("lookup")
        .expect("invoice exists");

    let with_items = invoice_repo
        .find_with_items(stored.id)
        .await
        .expect("load items")
        .expect("invoice exists");

    // Tuition line first, extras at face value, total is the exact sum.
    assert_eq!(with_items.items[0].item_key, "tuition");
    let tuition = with_items.items[0].amount;
    assert_eq!(tuition % dec!(1000), Decimal::ZERO);
    let item_sum: Decimal = with_items.items.iter().map(|i| i.amount).sum();
    assert_eq!(with_items.invoice.total_amount, item_sum);
    assert_eq!(with_items.items.last().unwrap().amount, dec!(150000));
}

// ============================================================================
// Payment: pending -> paid once, second action is a no-op
// ============================================================================
#[tokio::test]
async fn test_mark_paid_is_a_noop_when_already_paid() {
    let Some(db) = test_db().await else { return };
    let year = unique_year(6000);
    seed_schedule(&db, 7, year).await;
    let student = seed_student(
        &db,
        SeedStudent {
            join_date: date(year, 7, 1),
            end_date: Some(date(year, 7, 31)),
            is_trial: false,
            guardian_count: 0,
        },
    )
    .await;

    let runs = BillingRunRepository::new(db.clone());
    runs.generate(7, year).await.expect("run");

    let invoice_repo = InvoiceRepository::new(db.clone());
    let stored = invoice_repo
        .find_by_student_period(student.id, 7, year)
        .await
        .expect("lookup")
        .expect("invoice exists");

    let first = invoice_repo.mark_paid(stored.id).await.expect("mark paid");
    assert!(!first.already_paid);
    let paid_at = first.invoice.paid_at.expect("paid_at stamped");

    let second = invoice_repo.mark_paid(stored.id).await.expect("mark paid again");
    assert!(second.already_paid);
    assert_eq!(second.invoice.paid_at, Some(paid_at));
}

// ============================================================================
// Notifications: one record per guardian, written as one batch
// ============================================================================
#[tokio::test]
async fn test_notifications_fan_out_per_guardian() {
    let Some(db) = test_db().await else { return };
    let year = unique_year(7000);
    seed_schedule(&db, 7, year).await;
    let student = seed_student(
        &db,
        SeedStudent {
            join_date: date(year, 7, 1),
            end_date: Some(date(year, 7, 31)),
            is_trial: false,
            guardian_count: 2,
        },
    )
    .await;

    let runs = BillingRunRepository::new(db.clone());
    let report = runs.generate(7, year).await.expect("run");
    assert_eq!(report.notifications_created, 2);

    let invoice_repo = InvoiceRepository::new(db.clone());
    let stored = invoice_repo
        .find_by_student_period(student.id, 7, year)
        .await
        .expect("lookup")
        .expect("invoice exists");

    let notification_repo = NotificationRepository::new(db.clone());
    let records = notification_repo
        .list_for_invoice(stored.id)
        .await
        .expect("list notifications");

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|n| !n.is_read));
    assert!(records.iter().all(|n| n.message.contains("Budi Santoso")));
}

// ============================================================================
// Fee schedules: one per period
// ============================================================================
#[tokio::test]
async fn test_duplicate_schedule_period_rejected() {
    let Some(db) = test_db().await else { return };
    let year = unique_year(8000);
    seed_schedule(&db, 7, year).await;

    let repo = FeeScheduleRepository::new(db.clone());
    let result = repo
        .create(CreateFeeScheduleInput {
            month: 7,
            year,
            trial_discount_percent: Decimal::ZERO,
            level_fees: vec![],
            extras: vec![],
        })
        .await;

    assert!(matches!(
        result,
        Err(FeeScheduleError::DuplicatePeriod { .. })
    ));
}
