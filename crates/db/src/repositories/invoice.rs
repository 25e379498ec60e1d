//! Invoice persistence.
//!
//! `InvoiceRepository` implements the core `InvoiceStore`; each unit of work
//! is one `DatabaseTransaction` with the tenant RLS context applied, so every
//! read inside it sees the invoice header and line items staged before it.

use chrono::Utc;
use madrasah_core::invoice::{
    AcademicTerm, AdjustmentType, FeeBreakdown, FeeCategory, GeneratedInvoice,
    GuardianFeeAdjustment, Invoice, InvoiceError, InvoiceLineItem, InvoiceStatus, InvoiceStore,
    InvoiceUnitOfWork, PaymentPlan, StudentEnrollment,
};
use madrasah_shared::{
    AcademicTermId, FeeCategoryId, GradeId, GuardianId, InvoiceId, InvoiceLineItemId, StudentId,
    TenantId, UserId,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

use super::is_unique_violation;
use crate::entities::{
    academic_terms, fee_categories, grades, guardian_fee_adjustments, guardians,
    invoice_line_items, invoices, sea_orm_active_enums, students,
};
use crate::rls::RlsConnection;

/// Unique constraint on `(tenant_id, invoice_number)`.
pub const INVOICE_NUMBER_CONSTRAINT: &str = "uq_invoices_tenant_number";

/// Unique constraint on `(guardian_id, academic_term_id)`.
pub const GUARDIAN_TERM_CONSTRAINT: &str = "uq_invoices_guardian_term";

/// Invoice repository implementation.
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

    /// Loads an academic term of the tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_term(
        &self,
        tenant_id: TenantId,
        term_id: AcademicTermId,
    ) -> Result<Option<AcademicTerm>, InvoiceError> {
        let rls = RlsConnection::new(&self.db, tenant_id)
            .await
            .map_err(InvoiceError::repository)?;

        let model = academic_terms::Entity::find_by_id(term_id.into_inner())
            .filter(academic_terms::Column::TenantId.eq(tenant_id.into_inner()))
            .one(rls.transaction())
            .await
            .map_err(InvoiceError::repository)?;

        rls.commit().await.map_err(InvoiceError::repository)?;
        model.map(term_to_domain).transpose()
    }

    /// Loads an invoice with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored breakdown cannot be decoded.
    pub async fn find_invoice(
        &self,
        tenant_id: TenantId,
        invoice_id: InvoiceId,
    ) -> Result<Option<GeneratedInvoice>, InvoiceError> {
        let rls = RlsConnection::new(&self.db, tenant_id)
            .await
            .map_err(InvoiceError::repository)?;
        let txn = rls.transaction();

        let Some(model) = invoices::Entity::find_by_id(invoice_id.into_inner())
            .filter(invoices::Column::TenantId.eq(tenant_id.into_inner()))
            .one(txn)
            .await
            .map_err(InvoiceError::repository)?
        else {
            rls.commit().await.map_err(InvoiceError::repository)?;
            return Ok(None);
        };

        let line_items = invoice_line_items::Entity::find()
            .filter(invoice_line_items::Column::InvoiceId.eq(model.id))
            .order_by_asc(invoice_line_items::Column::StudentName)
            .all(txn)
            .await
            .map_err(InvoiceError::repository)?
            .into_iter()
            .map(line_item_to_domain)
            .collect::<Result<Vec<_>, _>>()?;

        rls.commit().await.map_err(InvoiceError::repository)?;

        Ok(Some(GeneratedInvoice {
            invoice: invoice_to_domain(model),
            line_items,
        }))
    }

    /// Persists a recorded payment: amount paid, balance and status.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn save_payment(&self, invoice: &Invoice) -> Result<(), InvoiceError> {
        let rls = RlsConnection::new(&self.db, invoice.tenant_id)
            .await
            .map_err(InvoiceError::repository)?;

        invoices::ActiveModel {
            id: Unchanged(invoice.id.into_inner()),
            amount_paid: Set(invoice.amount_paid),
            balance_due: Set(invoice.balance_due),
            status: Set(status_to_db(invoice.status)),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(rls.transaction())
        .await
        .map_err(InvoiceError::repository)?;

        rls.commit().await.map_err(InvoiceError::repository)?;

        tracing::info!(
            tenant_id = %invoice.tenant_id,
            invoice_number = %invoice.invoice_number,
            amount_paid = %invoice.amount_paid,
            "Invoice payment saved"
        );
        Ok(())
    }
}

impl InvoiceStore for InvoiceRepository {
    type UnitOfWork = DbInvoiceUnitOfWork;

    async fn begin(&self, tenant_id: TenantId) -> Result<DbInvoiceUnitOfWork, InvoiceError> {
        let rls = RlsConnection::new(&self.db, tenant_id)
            .await
            .map_err(InvoiceError::repository)?;

        Ok(DbInvoiceUnitOfWork {
            tenant_id,
            txn: rls.into_transaction(),
        })
    }

    async fn active_guardians(&self, tenant_id: TenantId) -> Result<Vec<GuardianId>, InvoiceError> {
        let rls = RlsConnection::new(&self.db, tenant_id)
            .await
            .map_err(InvoiceError::repository)?;

        let ids: Vec<uuid::Uuid> = guardians::Entity::find()
            .select_only()
            .column(guardians::Column::Id)
            .filter(guardians::Column::TenantId.eq(tenant_id.into_inner()))
            .filter(guardians::Column::IsActive.eq(true))
            .order_by_asc(guardians::Column::GuardianNumber)
            .into_tuple()
            .all(rls.transaction())
            .await
            .map_err(InvoiceError::repository)?;

        rls.commit().await.map_err(InvoiceError::repository)?;
        Ok(ids.into_iter().map(GuardianId::from_uuid).collect())
    }
}

/// One invoice generation transaction.
pub struct DbInvoiceUnitOfWork {
    tenant_id: TenantId,
    txn: DatabaseTransaction,
}

impl InvoiceUnitOfWork for DbInvoiceUnitOfWork {
    async fn invoice_exists(
        &self,
        guardian_id: GuardianId,
        term_id: AcademicTermId,
    ) -> Result<bool, InvoiceError> {
        let count = invoices::Entity::find()
            .filter(invoices::Column::TenantId.eq(self.tenant_id.into_inner()))
            .filter(invoices::Column::GuardianId.eq(guardian_id.into_inner()))
            .filter(invoices::Column::AcademicTermId.eq(term_id.into_inner()))
            .count(&self.txn)
            .await
            .map_err(InvoiceError::repository)?;

        Ok(count > 0)
    }

    async fn invoice_numbers_with_prefix(&self, prefix: &str) -> Result<Vec<String>, InvoiceError> {
        invoices::Entity::find()
            .select_only()
            .column(invoices::Column::InvoiceNumber)
            .filter(invoices::Column::TenantId.eq(self.tenant_id.into_inner()))
            .filter(invoices::Column::InvoiceNumber.starts_with(prefix))
            .into_tuple()
            .all(&self.txn)
            .await
            .map_err(InvoiceError::repository)
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), InvoiceError> {
        let active_model = invoices::ActiveModel {
            id: Set(invoice.id.into_inner()),
            tenant_id: Set(invoice.tenant_id.into_inner()),
            guardian_id: Set(invoice.guardian_id.into_inner()),
            academic_term_id: Set(invoice.academic_term_id.into_inner()),
            invoice_number: Set(invoice.invoice_number.clone()),
            invoice_date: Set(invoice.invoice_date),
            due_date: Set(invoice.due_date),
            payment_plan: Set(plan_to_db(invoice.payment_plan)),
            subtotal: Set(invoice.subtotal),
            discount: Set(invoice.discount),
            total: Set(invoice.total),
            amount_paid: Set(invoice.amount_paid),
            balance_due: Set(invoice.balance_due),
            status: Set(status_to_db(invoice.status)),
            notes: Set(invoice.notes.clone()),
            generated_by: Set(invoice.generated_by.into_inner()),
            created_at: Set(invoice.created_at.into()),
            updated_at: Set(invoice.created_at.into()),
        };

        active_model
            .insert(&self.txn)
            .await
            .map_err(|e| map_invoice_insert_error(&e, invoice))?;

        Ok(())
    }

    async fn active_students(
        &self,
        guardian_id: GuardianId,
    ) -> Result<Vec<StudentEnrollment>, InvoiceError> {
        let rows = students::Entity::find()
            .filter(students::Column::TenantId.eq(self.tenant_id.into_inner()))
            .filter(students::Column::GuardianId.eq(guardian_id.into_inner()))
            .filter(students::Column::IsActive.eq(true))
            .order_by_asc(students::Column::AdmissionNumber)
            .find_also_related(grades::Entity)
            .all(&self.txn)
            .await
            .map_err(InvoiceError::repository)?;

        rows.into_iter()
            .map(|(student, grade)| {
                let grade = grade.ok_or_else(|| {
                    InvoiceError::Repository(format!(
                        "Grade {} of student {} not found",
                        student.grade_id, student.id
                    ))
                })?;
                Ok(StudentEnrollment {
                    student_id: StudentId::from_uuid(student.id),
                    student_name: student.full_name,
                    grade_id: GradeId::from_uuid(grade.id),
                    grade_name: grade.name,
                })
            })
            .collect()
    }

    async fn fee_categories(&self, grade_id: GradeId) -> Result<Vec<FeeCategory>, InvoiceError> {
        let models = fee_categories::Entity::find()
            .filter(fee_categories::Column::TenantId.eq(self.tenant_id.into_inner()))
            .filter(fee_categories::Column::GradeId.eq(grade_id.into_inner()))
            .order_by_asc(fee_categories::Column::SortOrder)
            .order_by_asc(fee_categories::Column::Name)
            .all(&self.txn)
            .await
            .map_err(InvoiceError::repository)?;

        Ok(models
            .into_iter()
            .map(|m| FeeCategory {
                id: FeeCategoryId::from_uuid(m.id),
                grade_id: GradeId::from_uuid(m.grade_id),
                name: m.name,
                amount: m.amount,
                is_active: m.is_active,
            })
            .collect())
    }

    async fn fee_adjustments(
        &self,
        guardian_id: GuardianId,
        term_id: AcademicTermId,
    ) -> Result<Vec<GuardianFeeAdjustment>, InvoiceError> {
        let models = guardian_fee_adjustments::Entity::find()
            .filter(guardian_fee_adjustments::Column::TenantId.eq(self.tenant_id.into_inner()))
            .filter(guardian_fee_adjustments::Column::GuardianId.eq(guardian_id.into_inner()))
            .filter(guardian_fee_adjustments::Column::AcademicTermId.eq(term_id.into_inner()))
            .all(&self.txn)
            .await
            .map_err(InvoiceError::repository)?;

        Ok(models
            .into_iter()
            .map(|m| GuardianFeeAdjustment {
                guardian_id: GuardianId::from_uuid(m.guardian_id),
                academic_term_id: AcademicTermId::from_uuid(m.academic_term_id),
                category_name: m.category_name,
                adjustment_type: adjustment_from_db(m.adjustment_type),
                custom_amount: m.custom_amount,
            })
            .collect())
    }

    async fn insert_line_item(&self, item: &InvoiceLineItem) -> Result<(), InvoiceError> {
        let fee_breakdown = breakdown_to_db(&item.fee_breakdown)?;

        invoice_line_items::ActiveModel {
            id: Set(item.id.into_inner()),
            tenant_id: Set(self.tenant_id.into_inner()),
            invoice_id: Set(item.invoice_id.into_inner()),
            student_id: Set(item.student_id.into_inner()),
            student_name: Set(item.student_name.clone()),
            grade_name: Set(item.grade_name.clone()),
            fee_breakdown: Set(fee_breakdown),
            total_amount: Set(item.total_amount),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.txn)
        .await
        .map_err(InvoiceError::repository)?;

        Ok(())
    }

    async fn update_invoice_totals(&self, invoice: &Invoice) -> Result<(), InvoiceError> {
        invoices::ActiveModel {
            id: Unchanged(invoice.id.into_inner()),
            subtotal: Set(invoice.subtotal),
            discount: Set(invoice.discount),
            total: Set(invoice.total),
            amount_paid: Set(invoice.amount_paid),
            balance_due: Set(invoice.balance_due),
            status: Set(status_to_db(invoice.status)),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(InvoiceError::repository)?;

        Ok(())
    }

    async fn commit(self) -> Result<(), InvoiceError> {
        self.txn.commit().await.map_err(InvoiceError::repository)
    }

    async fn rollback(self) -> Result<(), InvoiceError> {
        self.txn.rollback().await.map_err(InvoiceError::repository)
    }
}

/// Maps a failed header insert to the generation error it stands for.
fn map_invoice_insert_error(err: &DbErr, invoice: &Invoice) -> InvoiceError {
    if is_unique_violation(err, GUARDIAN_TERM_CONSTRAINT) {
        InvoiceError::DuplicateInvoice {
            guardian_id: invoice.guardian_id,
            term_id: invoice.academic_term_id,
        }
    } else if is_unique_violation(err, INVOICE_NUMBER_CONSTRAINT) {
        InvoiceError::NumberConflict(invoice.invoice_number.clone())
    } else {
        InvoiceError::repository(err)
    }
}

// ========== Conversions ==========

fn term_to_domain(model: academic_terms::Model) -> Result<AcademicTerm, InvoiceError> {
    let term_number = u32::try_from(model.term_number).map_err(|_| {
        InvoiceError::Repository(format!(
            "Term {} has invalid number {}",
            model.id, model.term_number
        ))
    })?;

    Ok(AcademicTerm {
        id: AcademicTermId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        name: model.name,
        term_number,
        start_date: model.start_date,
        end_date: model.end_date,
    })
}

fn invoice_to_domain(model: invoices::Model) -> Invoice {
    Invoice {
        id: InvoiceId::from_uuid(model.id),
        tenant_id: TenantId::from_uuid(model.tenant_id),
        guardian_id: GuardianId::from_uuid(model.guardian_id),
        academic_term_id: AcademicTermId::from_uuid(model.academic_term_id),
        invoice_number: model.invoice_number,
        invoice_date: model.invoice_date,
        due_date: model.due_date,
        payment_plan: plan_from_db(model.payment_plan),
        subtotal: model.subtotal,
        discount: model.discount,
        total: model.total,
        amount_paid: model.amount_paid,
        balance_due: model.balance_due,
        status: status_from_db(model.status),
        notes: model.notes,
        generated_by: UserId::from_uuid(model.generated_by),
        created_at: model.created_at.with_timezone(&Utc),
    }
}

/// Stored as an array of `[category, amount]` pairs so category order survives.
fn breakdown_to_db(breakdown: &FeeBreakdown) -> Result<serde_json::Value, InvoiceError> {
    let pairs: Vec<(&str, rust_decimal::Decimal)> = breakdown.iter().collect();
    serde_json::to_value(pairs).map_err(InvoiceError::repository)
}

fn breakdown_from_db(value: serde_json::Value) -> Result<FeeBreakdown, InvoiceError> {
    let pairs: Vec<(String, rust_decimal::Decimal)> =
        serde_json::from_value(value).map_err(InvoiceError::repository)?;
    Ok(pairs.into_iter().collect())
}

fn line_item_to_domain(model: invoice_line_items::Model) -> Result<InvoiceLineItem, InvoiceError> {
    let fee_breakdown = breakdown_from_db(model.fee_breakdown)?;

    Ok(InvoiceLineItem {
        id: InvoiceLineItemId::from_uuid(model.id),
        invoice_id: InvoiceId::from_uuid(model.invoice_id),
        student_id: StudentId::from_uuid(model.student_id),
        student_name: model.student_name,
        grade_name: model.grade_name,
        fee_breakdown,
        total_amount: model.total_amount,
    })
}

const fn plan_to_db(plan: PaymentPlan) -> sea_orm_active_enums::PaymentPlan {
    match plan {
        PaymentPlan::Full => sea_orm_active_enums::PaymentPlan::Full,
        PaymentPlan::HalfHalf => sea_orm_active_enums::PaymentPlan::HalfHalf,
        PaymentPlan::Monthly => sea_orm_active_enums::PaymentPlan::Monthly,
    }
}

const fn plan_from_db(plan: sea_orm_active_enums::PaymentPlan) -> PaymentPlan {
    match plan {
        sea_orm_active_enums::PaymentPlan::Full => PaymentPlan::Full,
        sea_orm_active_enums::PaymentPlan::HalfHalf => PaymentPlan::HalfHalf,
        sea_orm_active_enums::PaymentPlan::Monthly => PaymentPlan::Monthly,
    }
}

const fn status_to_db(status: InvoiceStatus) -> sea_orm_active_enums::InvoiceStatus {
    match status {
        InvoiceStatus::Unpaid => sea_orm_active_enums::InvoiceStatus::Unpaid,
        InvoiceStatus::PartiallyPaid => sea_orm_active_enums::InvoiceStatus::PartiallyPaid,
        InvoiceStatus::Paid => sea_orm_active_enums::InvoiceStatus::Paid,
    }
}

const fn status_from_db(status: sea_orm_active_enums::InvoiceStatus) -> InvoiceStatus {
    match status {
        sea_orm_active_enums::InvoiceStatus::Unpaid => InvoiceStatus::Unpaid,
        sea_orm_active_enums::InvoiceStatus::PartiallyPaid => InvoiceStatus::PartiallyPaid,
        sea_orm_active_enums::InvoiceStatus::Paid => InvoiceStatus::Paid,
    }
}

const fn adjustment_from_db(kind: sea_orm_active_enums::AdjustmentType) -> AdjustmentType {
    match kind {
        sea_orm_active_enums::AdjustmentType::Exclude => AdjustmentType::Exclude,
        sea_orm_active_enums::AdjustmentType::CustomAmount => AdjustmentType::CustomAmount,
    }
}
