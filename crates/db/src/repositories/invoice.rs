//! Invoice repository for invoice database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use skolara_core::billing::{InvoiceDraft, InvoiceStatus, PaymentOutcome, apply_payment};
use skolara_core::reports::InvoiceSummary;
use skolara_shared::types::PageRequest;

use crate::entities::{
    invoice_items, invoices, sea_orm_active_enums::InvoiceStatus as DbInvoiceStatus, students,
};

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Invoice with its line items.
#[derive(Debug, Clone)]
pub struct InvoiceWithItems {
    /// The invoice record.
    pub invoice: invoices::Model,
    /// Line items in invoice order; the tuition line comes first.
    pub items: Vec<invoice_items::Model>,
}

/// Filter for invoice listing.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Billing month.
    pub month: Option<u8>,
    /// Billing year.
    pub year: Option<i32>,
    /// Payment status.
    pub status: Option<DbInvoiceStatus>,
    /// Student the invoices belong to.
    pub student_id: Option<Uuid>,
}

/// Result of a payment action.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    /// The invoice after the action.
    pub invoice: invoices::Model,
    /// True when the invoice was already paid and nothing changed.
    pub already_paid: bool,
}

/// One row of the period export.
#[derive(Debug, Clone)]
pub struct InvoiceExportRow {
    /// The invoice record.
    pub invoice: invoices::Model,
    /// Student display name.
    pub student_name: String,
}

/// Converts a stored status into the engine's status type.
#[must_use]
pub const fn status_to_core(status: &DbInvoiceStatus) -> InvoiceStatus {
    match status {
        DbInvoiceStatus::Pending => InvoiceStatus::Pending,
        DbInvoiceStatus::Paid => InvoiceStatus::Paid,
    }
}

/// Invoice repository for CRUD and payment operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the invoice for a (student, month, year) key, if any.
    ///
    /// This is the primary idempotency mechanism of a billing run; the
    /// unique index on the same key is only a safety net.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_student_period(
        &self,
        student_id: Uuid,
        month: u8,
        year: i32,
    ) -> Result<Option<invoices::Model>, InvoiceError> {
        let invoice = invoices::Entity::find()
            .filter(invoices::Column::StudentId.eq(student_id))
            .filter(invoices::Column::Month.eq(i16::from(month)))
            .filter(invoices::Column::Year.eq(year))
            .one(&self.db)
            .await?;
        Ok(invoice)
    }

    /// Persists a computed invoice draft with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including a unique-constraint
    /// violation on (student, month, year).
    pub async fn create_from_draft(
        &self,
        draft: &InvoiceDraft,
    ) -> Result<InvoiceWithItems, InvoiceError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let invoice_id = Uuid::new_v4();

        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            student_id: Set(draft.student_id.into_inner()),
            month: Set(i16::from(draft.month)),
            year: Set(draft.year),
            level_code: Set(draft.level_code.clone()),
            is_trial: Set(draft.is_trial),
            study_days: Set(i32::try_from(draft.study_days).unwrap_or(i32::MAX)),
            total_amount: Set(draft.total_amount),
            status: Set(DbInvoiceStatus::Pending),
            paid_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let invoice = invoice.insert(&txn).await?;

        let mut items = Vec::with_capacity(draft.items.len());
        for (index, item) in draft.items.iter().enumerate() {
            let model = invoice_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                item_key: Set(item.item_key.clone()),
                name: Set(item.name.clone()),
                amount: Set(item.amount),
                sort_order: Set(i16::try_from(index).unwrap_or(i16::MAX)),
            };
            items.push(model.insert(&txn).await?);
        }

        txn.commit().await?;

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Finds an invoice by ID with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_items(
        &self,
        id: Uuid,
    ) -> Result<Option<InvoiceWithItems>, InvoiceError> {
        let Some(invoice) = invoices::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let items = invoice
            .find_related(invoice_items::Entity)
            .order_by_asc(invoice_items::Column::SortOrder)
            .all(&self.db)
            .await?;

        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    /// Lists invoices matching the filter, newest first, with a total count
    /// for pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &InvoiceFilter,
        page: &PageRequest,
    ) -> Result<(Vec<invoices::Model>, u64), InvoiceError> {
        let mut query = invoices::Entity::find();

        if let Some(month) = filter.month {
            query = query.filter(invoices::Column::Month.eq(i16::from(month)));
        }
        if let Some(year) = filter.year {
            query = query.filter(invoices::Column::Year.eq(year));
        }
        if let Some(status) = &filter.status {
            query = query.filter(invoices::Column::Status.eq(status.clone()));
        }
        if let Some(student_id) = filter.student_id {
            query = query.filter(invoices::Column::StudentId.eq(student_id));
        }

        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(invoices::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Applies a payment action to an invoice.
    ///
    /// Marking an already-paid invoice is a distinguishable no-op: the
    /// stored `paid_at` is left untouched and `already_paid` is set on the
    /// receipt.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the invoice does not exist, or a database
    /// error.
    pub async fn mark_paid(&self, id: Uuid) -> Result<PaymentReceipt, InvoiceError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(InvoiceError::NotFound(id))?;

        match apply_payment(status_to_core(&invoice.status)) {
            PaymentOutcome::AlreadyPaid => Ok(PaymentReceipt {
                invoice,
                already_paid: true,
            }),
            PaymentOutcome::Marked => {
                let now = Utc::now().into();
                let mut active: invoices::ActiveModel = invoice.into();
                active.status = Set(DbInvoiceStatus::Paid);
                active.paid_at = Set(Some(now));
                active.updated_at = Set(now);
                let invoice = active.update(&self.db).await?;

                Ok(PaymentReceipt {
                    invoice,
                    already_paid: false,
                })
            }
        }
    }

    /// Loads one export row per invoice of a billing period, with the
    /// student's name, ordered by student name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn export_rows(
        &self,
        month: u8,
        year: i32,
    ) -> Result<Vec<InvoiceExportRow>, InvoiceError> {
        let rows = invoices::Entity::find()
            .filter(invoices::Column::Month.eq(i16::from(month)))
            .filter(invoices::Column::Year.eq(year))
            .find_also_related(students::Entity)
            .order_by_asc(students::Column::Name)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(invoice, student)| InvoiceExportRow {
                invoice,
                student_name: student.map(|s| s.name).unwrap_or_default(),
            })
            .collect())
    }

    /// Loads the recap rows for a year.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn yearly_summaries(&self, year: i32) -> Result<Vec<InvoiceSummary>, InvoiceError> {
        let rows = invoices::Entity::find()
            .filter(invoices::Column::Year.eq(year))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|invoice| InvoiceSummary {
                month: u8::try_from(invoice.month).unwrap_or_default(),
                status: status_to_core(&invoice.status),
                total_amount: invoice.total_amount,
            })
            .collect())
    }
}
