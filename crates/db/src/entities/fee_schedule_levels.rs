//! `SeaORM` Entity for the fee_schedule_levels table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fee_schedule_levels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fee_schedule_id: Uuid,
    pub level_code: String,
    pub amount: Decimal,
    pub sort_order: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fee_schedules::Entity",
        from = "Column::FeeScheduleId",
        to = "super::fee_schedules::Column::Id"
    )]
    FeeSchedules,
}

impl Related<super::fee_schedules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeeSchedules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
