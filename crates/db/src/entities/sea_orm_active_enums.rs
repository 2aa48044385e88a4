//! Database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Enrollment status of a student.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "student_status")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    /// Student is enrolled and billable.
    #[sea_orm(string_value = "active")]
    Active,
    /// Student has left; never billed.
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Payment status of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Awaiting payment.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid in full.
    #[sea_orm(string_value = "paid")]
    Paid,
}
