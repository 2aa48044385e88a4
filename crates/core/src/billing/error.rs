//! Error types for the billing engine.

use thiserror::Error;

/// Errors that abort a billing run before any student is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// The requested billing period is not a valid calendar month.
    #[error("Invalid billing period {month}/{year}")]
    InvalidPeriod {
        /// Requested month (expected 1-12).
        month: u8,
        /// Requested year.
        year: i32,
    },

    /// No fee schedule is configured for the period. Billing must never
    /// proceed with an implicit or default price.
    #[error("No fee schedule configured for period {month}/{year}")]
    ScheduleNotConfigured {
        /// Billing month.
        month: u8,
        /// Billing year.
        year: i32,
    },
}

/// Errors rejecting an administratively submitted fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleValidationError {
    /// Month outside 1-12.
    #[error("Schedule month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),

    /// A level appears more than once.
    #[error("Duplicate level code in schedule: {0}")]
    DuplicateLevel(String),

    /// A level base fee must be positive.
    #[error("Base fee for level {0} must be positive")]
    NonPositiveLevelFee(String),

    /// An extra fee amount must be positive.
    #[error("Extra fee {0} must be positive")]
    NonPositiveExtraFee(String),

    /// An extra fee key appears more than once.
    #[error("Duplicate extra fee key in schedule: {0}")]
    DuplicateExtraKey(String),

    /// Trial discount must be a percentage.
    #[error("Trial discount must be between 0 and 100, got {0}")]
    DiscountOutOfRange(rust_decimal::Decimal),
}
