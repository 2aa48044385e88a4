//! Fee schedule repository for schedule database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use skolara_core::billing::{ExtraFee, LevelFee, ResolvedFeeSchedule};

use crate::entities::{fee_schedule_extras, fee_schedule_levels, fee_schedules};

/// Error types for fee schedule operations.
#[derive(Debug, thiserror::Error)]
pub enum FeeScheduleError {
    /// Fee schedule not found.
    #[error("Fee schedule not found: {0}")]
    NotFound(Uuid),

    /// A schedule already exists for the period.
    #[error("A fee schedule already exists for period {month}/{year}")]
    DuplicatePeriod {
        /// Requested month.
        month: u8,
        /// Requested year.
        year: i32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a fee schedule.
#[derive(Debug, Clone)]
pub struct CreateFeeScheduleInput {
    /// Billing month (1-12).
    pub month: u8,
    /// Billing year.
    pub year: i32,
    /// Trial discount percentage (0-100).
    pub trial_discount_percent: Decimal,
    /// Ordered level fees.
    pub level_fees: Vec<LevelFee>,
    /// Ordered extra fees.
    pub extras: Vec<ExtraFee>,
}

/// Input for updating a fee schedule. Levels and extras are replaced
/// wholesale when present.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeeScheduleInput {
    /// New trial discount percentage.
    pub trial_discount_percent: Option<Decimal>,
    /// Replacement level fees.
    pub level_fees: Option<Vec<LevelFee>>,
    /// Replacement extra fees.
    pub extras: Option<Vec<ExtraFee>>,
}

/// Fee schedule with its level and extra fee rows.
#[derive(Debug, Clone)]
pub struct FeeScheduleWithItems {
    /// The schedule record.
    pub schedule: fee_schedules::Model,
    /// Level fee rows, in configured order.
    pub levels: Vec<fee_schedule_levels::Model>,
    /// Extra fee rows, in configured order.
    pub extras: Vec<fee_schedule_extras::Model>,
}

impl FeeScheduleWithItems {
    /// Converts the rows into the immutable schedule snapshot the billing
    /// engine computes against.
    #[must_use]
    pub fn resolve(&self) -> ResolvedFeeSchedule {
        ResolvedFeeSchedule {
            month: u8::try_from(self.schedule.month).unwrap_or_default(),
            year: self.schedule.year,
            level_fees: self
                .levels
                .iter()
                .map(|level| LevelFee {
                    level_code: level.level_code.clone(),
                    amount: level.amount,
                })
                .collect(),
            extras: self
                .extras
                .iter()
                .map(|extra| ExtraFee {
                    fee_key: extra.fee_key.clone(),
                    name: extra.name.clone(),
                    amount: extra.amount,
                })
                .collect(),
            trial_discount_percent: self.schedule.trial_discount_percent,
        }
    }
}

/// Fee schedule repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct FeeScheduleRepository {
    db: DatabaseConnection,
}

impl FeeScheduleRepository {
    /// Creates a new fee schedule repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a fee schedule with its level and extra fee rows.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePeriod` if a schedule already exists for
    /// (month, year), or a database error.
    pub async fn create(
        &self,
        input: CreateFeeScheduleInput,
    ) -> Result<FeeScheduleWithItems, FeeScheduleError> {
        let existing = fee_schedules::Entity::find()
            .filter(fee_schedules::Column::Month.eq(i16::from(input.month)))
            .filter(fee_schedules::Column::Year.eq(input.year))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(FeeScheduleError::DuplicatePeriod {
                month: input.month,
                year: input.year,
            });
        }

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let schedule_id = Uuid::new_v4();

        let schedule = fee_schedules::ActiveModel {
            id: Set(schedule_id),
            month: Set(i16::from(input.month)),
            year: Set(input.year),
            trial_discount_percent: Set(input.trial_discount_percent),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let schedule = schedule.insert(&txn).await?;

        let levels = insert_levels(&txn, schedule_id, &input.level_fees).await?;
        let extras = insert_extras(&txn, schedule_id, &input.extras).await?;

        txn.commit().await?;

        Ok(FeeScheduleWithItems {
            schedule,
            levels,
            extras,
        })
    }

    /// Updates a fee schedule, replacing levels and extras wholesale when
    /// provided. Issued invoices are never touched; they snapshot their own
    /// amounts at generation time.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the schedule does not exist, or a database
    /// error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateFeeScheduleInput,
    ) -> Result<FeeScheduleWithItems, FeeScheduleError> {
        let schedule = fee_schedules::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(FeeScheduleError::NotFound(id))?;

        let txn = self.db.begin().await?;

        let mut active: fee_schedules::ActiveModel = schedule.into();
        if let Some(discount) = input.trial_discount_percent {
            active.trial_discount_percent = Set(discount);
        }
        active.updated_at = Set(Utc::now().into());
        let schedule = active.update(&txn).await?;

        if let Some(level_fees) = &input.level_fees {
            fee_schedule_levels::Entity::delete_many()
                .filter(fee_schedule_levels::Column::FeeScheduleId.eq(id))
                .exec(&txn)
                .await?;
            insert_levels(&txn, id, level_fees).await?;
        }
        if let Some(extras) = &input.extras {
            fee_schedule_extras::Entity::delete_many()
                .filter(fee_schedule_extras::Column::FeeScheduleId.eq(id))
                .exec(&txn)
                .await?;
            insert_extras(&txn, id, extras).await?;
        }

        txn.commit().await?;

        self.load_items(schedule).await
    }

    /// Finds a fee schedule by ID with its rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<FeeScheduleWithItems>, FeeScheduleError> {
        let Some(schedule) = fee_schedules::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        self.load_items(schedule).await.map(Some)
    }

    /// Finds the fee schedule for a billing period with its rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_period(
        &self,
        month: u8,
        year: i32,
    ) -> Result<Option<FeeScheduleWithItems>, FeeScheduleError> {
        let Some(schedule) = fee_schedules::Entity::find()
            .filter(fee_schedules::Column::Month.eq(i16::from(month)))
            .filter(fee_schedules::Column::Year.eq(year))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        self.load_items(schedule).await.map(Some)
    }

    /// Resolves the schedule snapshot for a billing period.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn resolve_period(
        &self,
        month: u8,
        year: i32,
    ) -> Result<Option<ResolvedFeeSchedule>, FeeScheduleError> {
        Ok(self
            .find_by_period(month, year)
            .await?
            .map(|with_items| with_items.resolve()))
    }

    /// Lists all fee schedules for a year, ordered by month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_year(
        &self,
        year: i32,
    ) -> Result<Vec<FeeScheduleWithItems>, FeeScheduleError> {
        let schedules = fee_schedules::Entity::find()
            .filter(fee_schedules::Column::Year.eq(year))
            .order_by_asc(fee_schedules::Column::Month)
            .all(&self.db)
            .await?;

        let mut results = Vec::with_capacity(schedules.len());
        for schedule in schedules {
            results.push(self.load_items(schedule).await?);
        }
        Ok(results)
    }

    async fn load_items(
        &self,
        schedule: fee_schedules::Model,
    ) -> Result<FeeScheduleWithItems, FeeScheduleError> {
        let levels = schedule
            .find_related(fee_schedule_levels::Entity)
            .order_by_asc(fee_schedule_levels::Column::SortOrder)
            .all(&self.db)
            .await?;
        let extras = schedule
            .find_related(fee_schedule_extras::Entity)
            .order_by_asc(fee_schedule_extras::Column::SortOrder)
            .all(&self.db)
            .await?;

        Ok(FeeScheduleWithItems {
            schedule,
            levels,
            extras,
        })
    }
}

async fn insert_levels(
    txn: &sea_orm::DatabaseTransaction,
    schedule_id: Uuid,
    level_fees: &[LevelFee],
) -> Result<Vec<fee_schedule_levels::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(level_fees.len());
    for (index, fee) in level_fees.iter().enumerate() {
        let model = fee_schedule_levels::ActiveModel {
            id: Set(Uuid::new_v4()),
            fee_schedule_id: Set(schedule_id),
            level_code: Set(fee.level_code.clone()),
            amount: Set(fee.amount),
            sort_order: Set(i16::try_from(index).unwrap_or(i16::MAX)),
        };
        inserted.push(model.insert(txn).await?);
    }
    Ok(inserted)
}

async fn insert_extras(
    txn: &sea_orm::DatabaseTransaction,
    schedule_id: Uuid,
    extras: &[ExtraFee],
) -> Result<Vec<fee_schedule_extras::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(extras.len());
    for (index, extra) in extras.iter().enumerate() {
        let model = fee_schedule_extras::ActiveModel {
            id: Set(Uuid::new_v4()),
            fee_schedule_id: Set(schedule_id),
            fee_key: Set(extra.fee_key.clone()),
            name: Set(extra.name.clone()),
            amount: Set(extra.amount),
            sort_order: Set(i16::try_from(index).unwrap_or(i16::MAX)),
        };
        inserted.push(model.insert(txn).await?);
    }
    Ok(inserted)
}
