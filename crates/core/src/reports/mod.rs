//! Tuition recap aggregation.
//!
//! Pure aggregation over invoice summaries; the database layer supplies the
//! rows and the API layer exposes the result.

pub mod service;
pub mod types;


pub use service::RecapService;
pub use types::{InvoiceSummary, MonthlyRecap, YearlyRecap};
