//! Notification repository for batch persistence of guardian notifications.

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use skolara_core::notification::NotificationDraft;

use crate::entities::notifications;

/// Error types for notification operations.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Notification repository.
///
/// This engine only ever creates notifications; read state belongs to the
/// notification subsystem.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists rendered notifications as a single batch insert.
    ///
    /// One write per run, not per record; guardian counts run to the
    /// hundreds. Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_batch(&self, drafts: &[NotificationDraft]) -> Result<u64, NotificationError> {
        if drafts.is_empty() {
            return Ok(0);
        }

        let now = Utc::now().into();
        let models = drafts.iter().map(|draft| notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(draft.invoice_id.into_inner()),
            guardian_id: Set(draft.guardian_id.into_inner()),
            message: Set(draft.message.clone()),
            is_read: Set(false),
            created_at: Set(now),
        });

        let inserted = notifications::Entity::insert_many(models)
            .exec_without_returning(&self.db)
            .await?;

        Ok(inserted)
    }

    /// Lists notifications for an invoice, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_invoice(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<notifications::Model>, NotificationError> {
        let records = notifications::Entity::find()
            .filter(notifications::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(notifications::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(records)
    }
}
