//! Database seeder for Skolara development and testing.
//!
//! Seeds a class group, a small student roster with guardians, and a fee
//! schedule for the current month so a billing run can be triggered
//! immediately.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use skolara_db::entities::{
    class_groups, fee_schedule_extras, fee_schedule_levels, fee_schedules, guardians,
    sea_orm_active_enums::StudentStatus, students,
};

/// Test class group ID (consistent for all seeds)
const TEST_CLASS_GROUP_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Test student IDs (consistent for all seeds)
const STUDENT_FULL_MONTH_ID: &str = "00000000-0000-0000-0000-000000000011";
const STUDENT_MID_MONTH_ID: &str = "00000000-0000-0000-0000-000000000012";
const STUDENT_TRIAL_ID: &str = "00000000-0000-0000-0000-000000000013";
const STUDENT_INACTIVE_ID: &str = "00000000-0000-0000-0000-000000000014";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = skolara_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding class group...");
    seed_class_group(&db).await;

    println!("Seeding students and guardians...");
    seed_students(&db).await;

    println!("Seeding fee schedule for the current month...");
    seed_fee_schedule(&db).await;

    println!("Seeding complete!");
}

fn id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).unwrap()
}

/// Seeds a class group for development.
async fn seed_class_group(db: &DatabaseConnection) {
    if class_groups::Entity::find_by_id(id(TEST_CLASS_GROUP_ID))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Class group already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let group = class_groups::ActiveModel {
        id: Set(id(TEST_CLASS_GROUP_ID)),
        name: Set("SD Kelas 1A".to_string()),
        level_code: Set("sd".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    group.insert(db).await.expect("Failed to seed class group");
}

/// Seeds students covering the interesting billing cases: enrolled before
/// the month, joined mid-month, on trial, and inactive.
async fn seed_students(db: &DatabaseConnection) {
    let today = Utc::now().date_naive();
    let month_start = today.with_day(1).unwrap();

    let seeds = [
        (
            STUDENT_FULL_MONTH_ID,
            "Budi Santoso",
            month_start - Duration::days(180),
            false,
            StudentStatus::Active,
            vec!["Hendra Santoso", "Siti Santoso"],
        ),
        (
            STUDENT_MID_MONTH_ID,
            "Ani Wijaya",
            month_start + Duration::days(9),
            false,
            StudentStatus::Active,
            vec!["Dewi Wijaya"],
        ),
        (
            STUDENT_TRIAL_ID,
            "Rizky Pratama",
            month_start + Duration::days(2),
            true,
            StudentStatus::Active,
            vec!["Andi Pratama"],
        ),
        (
            STUDENT_INACTIVE_ID,
            "Citra Lestari",
            month_start - Duration::days(400),
            false,
            StudentStatus::Inactive,
            vec![],
        ),
    ];

    let now = Utc::now().into();
    for (student_id, name, join_date, is_trial, status, guardian_names) in seeds {
        if students::Entity::find_by_id(id(student_id))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Student {name} already exists, skipping...");
            continue;
        }

        let student = students::ActiveModel {
            id: Set(id(student_id)),
            name: Set(name.to_string()),
            level_code: Set("sd".to_string()),
            join_date: Set(join_date),
            end_date: Set(None),
            is_trial: Set(is_trial),
            status: Set(status),
            class_group_id: Set(Some(id(TEST_CLASS_GROUP_ID))),
            created_at: Set(now),
            updated_at: Set(now),
        };
        student.insert(db).await.expect("Failed to seed student");

        for guardian_name in guardian_names {
            let guardian = guardians::ActiveModel {
                id: Set(Uuid::new_v4()),
                student_id: Set(id(student_id)),
                name: Set(guardian_name.to_string()),
                phone: Set(Some("+62-812-0000-0000".to_string())),
                created_at: Set(now),
                updated_at: Set(now),
            };
            guardian.insert(db).await.expect("Failed to seed guardian");
        }
    }
}

/// Seeds a fee schedule for the current month.
async fn seed_fee_schedule(db: &DatabaseConnection) {
    let today = Utc::now().date_naive();
    let month = i16::try_from(today.month()).unwrap();
    let year = today.year();

    let existing = fee_schedules::Entity::find()
        .all(db)
        .await
        .unwrap_or_default()
        .into_iter()
        .any(|s| s.month == month && s.year == year);
    if existing {
        println!("  Fee schedule for {month}/{year} already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let schedule_id = Uuid::new_v4();

    let schedule = fee_schedules::ActiveModel {
        id: Set(schedule_id),
        month: Set(month),
        year: Set(year),
        trial_discount_percent: Set(Decimal::from(50)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    schedule
        .insert(db)
        .await
        .expect("Failed to seed fee schedule");

    let levels = [("tk", 1_500_000i64), ("sd", 2_000_000), ("smp", 2_500_000)];
    for (index, (level_code, amount)) in levels.iter().enumerate() {
        let level = fee_schedule_levels::ActiveModel {
            id: Set(Uuid::new_v4()),
            fee_schedule_id: Set(schedule_id),
            level_code: Set((*level_code).to_string()),
            amount: Set(Decimal::from(*amount)),
            sort_order: Set(i16::try_from(index).unwrap()),
        };
        level.insert(db).await.expect("Failed to seed level fee");
    }

    let extras = [
        ("activity", "Biaya kegiatan", 150_000i64),
        ("building", "Dana pembangunan", 100_000),
    ];
    for (index, (fee_key, name, amount)) in extras.iter().enumerate() {
        let extra = fee_schedule_extras::ActiveModel {
            id: Set(Uuid::new_v4()),
            fee_schedule_id: Set(schedule_id),
            fee_key: Set((*fee_key).to_string()),
            name: Set((*name).to_string()),
            amount: Set(Decimal::from(*amount)),
            sort_order: Set(i16::try_from(index).unwrap()),
        };
        extra.insert(db).await.expect("Failed to seed extra fee");
    }
}
