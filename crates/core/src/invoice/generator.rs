//! Transactional invoice generation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use madrasah_shared::{
    AcademicTermId, GradeId, GuardianId, InvoiceId, NumberingConfig, TenantId, UserId,
};
use rust_decimal::Decimal;

use super::error::InvoiceError;
use super::service::InvoiceService;
use super::types::{
    AcademicTerm, FeeCategory, GenerateInvoiceInput, GenerateInvoiceOptions, GeneratedInvoice,
    GuardianFeeAdjustment, GuardianOutcome, Invoice, InvoiceLineItem, InvoiceStatus, PaymentPlan,
    StudentEnrollment, TermGenerationReport,
};
use crate::clock::Clock;
use crate::numbering::SequenceScope;

/// One atomic invoice-generation scope.
///
/// Every read sees the writes staged earlier in the same unit. Nothing is
/// visible to other units until `commit`; `rollback` discards everything.
pub trait InvoiceUnitOfWork: Send + Sync {
    /// Returns true if the guardian already has an invoice for the term.
    fn invoice_exists(
        &self,
        guardian_id: GuardianId,
        term_id: AcademicTermId,
    ) -> impl Future<Output = Result<bool, InvoiceError>> + Send;

    /// Returns the tenant's invoice numbers starting with `prefix`.
    fn invoice_numbers_with_prefix(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, InvoiceError>> + Send;

    /// Inserts an invoice header.
    ///
    /// Must return `InvoiceError::NumberConflict` when the number is taken
    /// and `InvoiceError::DuplicateInvoice` when the guardian already has an
    /// invoice for the term.
    fn insert_invoice(
        &self,
        invoice: &Invoice,
    ) -> impl Future<Output = Result<(), InvoiceError>> + Send;

    /// Active students of the guardian, with their current grade.
    fn active_students(
        &self,
        guardian_id: GuardianId,
    ) -> impl Future<Output = Result<Vec<StudentEnrollment>, InvoiceError>> + Send;

    /// Fee categories configured for a grade, in display order.
    fn fee_categories(
        &self,
        grade_id: GradeId,
    ) -> impl Future<Output = Result<Vec<FeeCategory>, InvoiceError>> + Send;

    /// The guardian's fee adjustments for the term.
    fn fee_adjustments(
        &self,
        guardian_id: GuardianId,
        term_id: AcademicTermId,
    ) -> impl Future<Output = Result<Vec<GuardianFeeAdjustment>, InvoiceError>> + Send;

    /// Inserts one line item.
    fn insert_line_item(
        &self,
        item: &InvoiceLineItem,
    ) -> impl Future<Output = Result<(), InvoiceError>> + Send;

    /// Persists the header's totals, balance and status.
    fn update_invoice_totals(
        &self,
        invoice: &Invoice,
    ) -> impl Future<Output = Result<(), InvoiceError>> + Send;

    /// Makes every staged write visible.
    fn commit(self) -> impl Future<Output = Result<(), InvoiceError>> + Send;

    /// Discards every staged write.
    fn rollback(self) -> impl Future<Output = Result<(), InvoiceError>> + Send;
}

/// Repository trait for invoice persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait InvoiceStore: Send + Sync {
    /// Unit of work type.
    type UnitOfWork: InvoiceUnitOfWork;

    /// Starts a unit of work scoped to one tenant.
    fn begin(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Self::UnitOfWork, InvoiceError>> + Send;

    /// Active guardians of the tenant, in a stable order.
    fn active_guardians(
        &self,
        tenant_id: TenantId,
    ) -> impl Future<Output = Result<Vec<GuardianId>, InvoiceError>> + Send;
}

/// Generates fee invoices inside a unit of work.
pub struct InvoiceGenerator<S: InvoiceStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl<S: InvoiceStore> InvoiceGenerator<S> {
    /// Creates a new invoice generator.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: &NumberingConfig) -> Self {
        Self {
            store,
            clock,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Generates the invoice of one guardian for one term.
    ///
    /// The whole operation is atomic. When the allocated invoice number is
    /// taken by a concurrent writer, the unit of work is rolled back and
    /// generation restarts with a fresh number.
    ///
    /// # Errors
    ///
    /// - `InvoiceError::DuplicateInvoice` if the guardian already has an
    ///   invoice for the term.
    /// - `InvoiceError::NoActiveStudents` if the guardian has no active students.
    /// - `InvoiceError::NumberConflict` once `max_attempts` is exhausted.
    pub async fn generate_for_guardian(
        &self,
        input: &GenerateInvoiceInput,
    ) -> Result<GeneratedInvoice, InvoiceError> {
        let invoice_date = input
            .options
            .invoice_date
            .unwrap_or_else(|| self.clock.today());

        let mut attempt = 1;
        loop {
            match self.try_generate(input, invoice_date).await {
                Ok(generated) => {
                    tracing::info!(
                        tenant_id = %input.tenant_id,
                        guardian_id = %input.guardian_id,
                        invoice_number = %generated.invoice.invoice_number,
                        line_items = generated.line_items.len(),
                        total = %generated.invoice.total,
                        "Invoice generated"
                    );
                    return Ok(generated);
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    tracing::warn!(
                        tenant_id = %input.tenant_id,
                        guardian_id = %input.guardian_id,
                        attempt,
                        error = %err,
                        "Invoice number conflict, retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Generates invoices for every active guardian of the tenant.
    ///
    /// Each guardian is generated in its own unit of work; a failure for one
    /// guardian is recorded in the report and does not stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error only if the guardian list cannot be loaded.
    pub async fn generate_for_term(
        &self,
        tenant_id: TenantId,
        term: &AcademicTerm,
        generated_by: UserId,
        payment_plan: PaymentPlan,
        options: &GenerateInvoiceOptions,
    ) -> Result<TermGenerationReport, InvoiceError> {
        let guardians = self.store.active_guardians(tenant_id).await?;
        let mut report = TermGenerationReport::default();

        for guardian_id in guardians {
            let input = GenerateInvoiceInput {
                tenant_id,
                guardian_id,
                term: term.clone(),
                generated_by,
                payment_plan,
                options: options.clone(),
            };

            let outcome = match self.generate_for_guardian(&input).await {
                Ok(generated) => GuardianOutcome::Generated {
                    invoice_number: generated.invoice.invoice_number,
                },
                Err(InvoiceError::DuplicateInvoice { .. }) => GuardianOutcome::SkippedDuplicate,
                Err(InvoiceError::NoActiveStudents(_)) => GuardianOutcome::SkippedNoActiveStudents,
                Err(err) => {
                    tracing::warn!(
                        tenant_id = %tenant_id,
                        guardian_id = %guardian_id,
                        error = %err,
                        "Invoice generation failed"
                    );
                    GuardianOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            report.results.push((guardian_id, outcome));
        }

        tracing::info!(
            tenant_id = %tenant_id,
            term = %term.name,
            generated = report.generated_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "Term invoice run finished"
        );

        Ok(report)
    }

    async fn try_generate(
        &self,
        input: &GenerateInvoiceInput,
        invoice_date: NaiveDate,
    ) -> Result<GeneratedInvoice, InvoiceError> {
        let uow = self.store.begin(input.tenant_id).await?;

        let result = Self::generate_in(&uow, input, invoice_date, self.clock.now()).await;
        match result {
            Ok(generated) => {
                uow.commit().await?;
                Ok(generated)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::error!(
                        tenant_id = %input.tenant_id,
                        guardian_id = %input.guardian_id,
                        error = %rollback_err,
                        "Failed to roll back invoice generation"
                    );
                }
                Err(err)
            }
        }
    }

    async fn generate_in(
        uow: &S::UnitOfWork,
        input: &GenerateInvoiceInput,
        invoice_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<GeneratedInvoice, InvoiceError> {
        let term = &input.term;

        // 1. One invoice per guardian and term
        if uow.invoice_exists(input.guardian_id, term.id).await? {
            return Err(InvoiceError::DuplicateInvoice {
                guardian_id: input.guardian_id,
                term_id: term.id,
            });
        }

        // 2. Number
        let scope = SequenceScope::for_invoice(invoice_date.year(), term.term_number);
        let existing = uow
            .invoice_numbers_with_prefix(&scope.pattern_prefix())
            .await?;
        let invoice_number = scope.next_identifier(&existing)?;

        // 3. Header
        let mut invoice = Invoice {
            id: InvoiceId::new(),
            tenant_id: input.tenant_id,
            guardian_id: input.guardian_id,
            academic_term_id: term.id,
            invoice_number,
            invoice_date,
            due_date: InvoiceService::due_date(invoice_date),
            payment_plan: input.payment_plan,
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            amount_paid: Decimal::ZERO,
            balance_due: Decimal::ZERO,
            status: InvoiceStatus::Unpaid,
            notes: input.options.notes.clone(),
            generated_by: input.generated_by,
            created_at,
        };
        uow.insert_invoice(&invoice).await?;

        // 4. One line item per active student
        let students = uow.active_students(input.guardian_id).await?;
        if students.is_empty() {
            return Err(InvoiceError::NoActiveStudents(input.guardian_id));
        }

        let adjustments = uow.fee_adjustments(input.guardian_id, term.id).await?;
        let mut categories_by_grade: HashMap<GradeId, Vec<FeeCategory>> = HashMap::new();
        let mut line_items = Vec::with_capacity(students.len());

        for student in &students {
            if !categories_by_grade.contains_key(&student.grade_id) {
                let categories = uow.fee_categories(student.grade_id).await?;
                categories_by_grade.insert(student.grade_id, categories);
            }
            let categories = categories_by_grade
                .get(&student.grade_id)
                .map_or(&[][..], Vec::as_slice);

            let breakdown = InvoiceService::resolve_fee_breakdown(categories, &adjustments)?;
            let item = InvoiceService::build_line_item(invoice.id, student, breakdown);
            uow.insert_line_item(&item).await?;
            line_items.push(item);
        }

        // 5. Totals
        let discount = input.options.discount.unwrap_or(Decimal::ZERO);
        let totals = InvoiceService::calculate_totals(&line_items, discount, invoice.amount_paid)?;
        InvoiceService::apply_totals(&mut invoice, totals);
        uow.update_invoice_totals(&invoice).await?;

        Ok(GeneratedInvoice {
            invoice,
            line_items,
        })
    }
}
