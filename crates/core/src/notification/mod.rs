//! Guardian notification rendering and fan-out.
//!
//! One record per (invoice, guardian) pair. This module only renders and
//! pairs; delivery and read state belong to the notification subsystem.

pub mod service;
pub mod types;

pub use service::{fan_out, month_name, render_message};
pub use types::{GuardianContact, InvoiceNotice, NotificationDraft};
