//! `SeaORM` Entity for the fee_schedules table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_schedules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub month: i16,
    pub year: i32,
    pub trial_discount_percent: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fee_schedule_levels::Entity")]
    FeeScheduleLevels,
    #[sea_orm(has_many = "super::fee_schedule_extras::Entity")]
    FeeScheduleExtras,
}

impl Related<super::fee_schedule_levels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeScheduleLevels.def()
    }
}

impl Related<super::fee_schedule_extras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeScheduleExtras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
