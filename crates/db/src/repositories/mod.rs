//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod billing;
pub mod fee_schedule;
pub mod invoice;
pub mod notification;

pub use billing::{BillingRunError, BillingRunRepository, RunReport};
pub use fee_schedule::{
    CreateFeeScheduleInput, FeeScheduleError, FeeScheduleRepository, FeeScheduleWithItems,
    UpdateFeeScheduleInput,
};
pub use invoice::{
    InvoiceError, InvoiceExportRow, InvoiceFilter, InvoiceRepository, InvoiceWithItems,
    PaymentReceipt,
};
pub use notification::{NotificationError, NotificationRepository};
