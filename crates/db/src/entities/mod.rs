//! `SeaORM` entity definitions.

pub mod class_groups;
pub mod fee_schedule_extras;
pub mod fee_schedule_levels;
pub mod fee_schedules;
pub mod guardians;
pub mod invoice_items;
pub mod invoices;
pub mod notifications;
pub mod sea_orm_active_enums;
pub mod students;
