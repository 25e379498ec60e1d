//! Invoice data types.

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use madrasah_shared::{
    AcademicTermId, FeeCategoryId, GradeId, GuardianId, InvoiceId, InvoiceLineItemId, StudentId,
    TenantId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the guardian intends to settle the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentPlan {
    /// Single payment.
    #[default]
    Full,
    /// Two equal installments.
    HalfHalf,
    /// Monthly installments.
    Monthly,
}

impl PaymentPlan {
    /// Database/API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::HalfHalf => "half_half",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for PaymentPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Self::Full),
            "half_half" => Ok(Self::HalfHalf),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown payment plan: {s}")),
        }
    }
}

/// Settlement status derived from amount paid against total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Nothing paid yet.
    Unpaid,
    /// Some, but not all, of the total is paid.
    PartiallyPaid,
    /// Fully settled.
    Paid,
}

impl InvoiceStatus {
    /// Database/API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("Unknown invoice status: {s}")),
        }
    }
}

/// An academic term invoices are issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicTerm {
    /// Term ID.
    pub id: AcademicTermId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name (e.g., "Term 1 2025").
    pub name: String,
    /// Term number within the academic year.
    pub term_number: u32,
    /// First day of the term.
    pub start_date: NaiveDate,
    /// Last day of the term.
    pub end_date: NaiveDate,
}

/// An active student of a guardian, with the grade used for fee lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentEnrollment {
    /// Student ID.
    pub student_id: StudentId,
    /// Student name at generation time.
    pub student_name: String,
    /// Grade ID.
    pub grade_id: GradeId,
    /// Grade name at generation time.
    pub grade_name: String,
}

/// A fee charged to every student of a grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeCategory {
    /// Category ID.
    pub id: FeeCategoryId,
    /// Grade the category belongs to.
    pub grade_id: GradeId,
    /// Category name; adjustments match on it.
    pub name: String,
    /// Default amount.
    pub amount: Decimal,
    /// Inactive categories are never charged.
    pub is_active: bool,
}

/// Kind of guardian-specific fee adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Remove the category from the breakdown.
    Exclude,
    /// Replace the category's default amount.
    CustomAmount,
}

impl AdjustmentType {
    /// Database/API representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::CustomAmount => "custom_amount",
        }
    }
}

impl std::str::FromStr for AdjustmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclude" => Ok(Self::Exclude),
            "custom_amount" => Ok(Self::CustomAmount),
            _ => Err(format!("Unknown adjustment type: {s}")),
        }
    }
}

/// Per-guardian, per-term override of a fee category, matched by category name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianFeeAdjustment {
    /// Guardian the adjustment applies to.
    pub guardian_id: GuardianId,
    /// Term the adjustment applies to.
    pub academic_term_id: AcademicTermId,
    /// Fee category name.
    pub category_name: String,
    /// Adjustment kind.
    pub adjustment_type: AdjustmentType,
    /// Replacement amount for `CustomAmount`.
    pub custom_amount: Option<Decimal>,
}

/// Ordered fee category name to amount map for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeBreakdown(IndexMap<String, Decimal>);

impl FeeBreakdown {
    /// Creates an empty breakdown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the amount for a category, keeping its first insertion position.
    pub fn insert(&mut self, category: impl Into<String>, amount: Decimal) {
        self.0.insert(category.into(), amount);
    }

    /// Amount charged for a category.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<Decimal> {
        self.0.get(category).copied()
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Iterates categories in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no category is charged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for FeeBreakdown {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One invoice row: all fees for a single student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    /// Line item ID.
    pub id: InvoiceLineItemId,
    /// Parent invoice.
    pub invoice_id: InvoiceId,
    /// Student charged.
    pub student_id: StudentId,
    /// Student name snapshot.
    pub student_name: String,
    /// Grade name snapshot.
    pub grade_name: String,
    /// Fees charged.
    pub fee_breakdown: FeeBreakdown,
    /// Sum of `fee_breakdown`.
    pub total_amount: Decimal,
}

/// A fee invoice for one guardian and one academic term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice ID.
    pub id: InvoiceId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Guardian billed.
    pub guardian_id: GuardianId,
    /// Term billed.
    pub academic_term_id: AcademicTermId,
    /// `INV-{YYYY}-T{n}-{NNNN}`.
    pub invoice_number: String,
    /// Issue date.
    pub invoice_date: NaiveDate,
    /// Issue date plus 14 days.
    pub due_date: NaiveDate,
    /// Payment plan.
    pub payment_plan: PaymentPlan,
    /// Sum of line item totals.
    pub subtotal: Decimal,
    /// Discount applied to the subtotal.
    pub discount: Decimal,
    /// Subtotal minus discount.
    pub total: Decimal,
    /// Payments recorded so far.
    pub amount_paid: Decimal,
    /// Total minus amount paid.
    pub balance_due: Decimal,
    /// Settlement status.
    pub status: InvoiceStatus,
    /// Optional notes.
    pub notes: Option<String>,
    /// Staff user who generated the invoice.
    pub generated_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Derived invoice totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line item totals.
    pub subtotal: Decimal,
    /// Discount applied.
    pub discount: Decimal,
    /// Subtotal minus discount.
    pub total: Decimal,
    /// Total minus amount paid.
    pub balance_due: Decimal,
}

/// Optional generation parameters.
#[derive(Debug, Clone, Default)]
pub struct GenerateInvoiceOptions {
    /// Issue date; defaults to today.
    pub invoice_date: Option<NaiveDate>,
    /// Discount on the subtotal; defaults to zero.
    pub discount: Option<Decimal>,
    /// Notes printed on the invoice.
    pub notes: Option<String>,
}

/// Input for generating one guardian's invoice.
#[derive(Debug, Clone)]
pub struct GenerateInvoiceInput {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Guardian billed.
    pub guardian_id: GuardianId,
    /// Term billed.
    pub term: AcademicTerm,
    /// Staff user generating the invoice.
    pub generated_by: UserId,
    /// Payment plan.
    pub payment_plan: PaymentPlan,
    /// Optional parameters.
    pub options: GenerateInvoiceOptions,
}

/// A persisted invoice with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedInvoice {
    /// Invoice header.
    pub invoice: Invoice,
    /// One line per active student.
    pub line_items: Vec<InvoiceLineItem>,
}

/// Outcome for one guardian in a term-wide run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardianOutcome {
    /// An invoice was created.
    Generated {
        /// Number of the new invoice.
        invoice_number: String,
    },
    /// The guardian already had an invoice for the term.
    SkippedDuplicate,
    /// The guardian has no active students.
    SkippedNoActiveStudents,
    /// Generation failed; nothing was persisted for this guardian.
    Failed {
        /// Error message.
        error: String,
    },
}

/// Result of generating invoices for many guardians.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermGenerationReport {
    /// Per-guardian outcomes, in input order.
    pub results: Vec<(GuardianId, GuardianOutcome)>,
}

impl TermGenerationReport {
    /// Number of invoices created.
    #[must_use]
    pub fn generated_count(&self) -> usize {
        self.count(|o| matches!(o, GuardianOutcome::Generated { .. }))
    }

    /// Number of guardians skipped (duplicate or no students).
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                GuardianOutcome::SkippedDuplicate | GuardianOutcome::SkippedNoActiveStudents
            )
        })
    }

    /// Number of guardians whose generation failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, GuardianOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&GuardianOutcome) -> bool) -> usize {
        self.results.iter().filter(|(_, o)| predicate(o)).count()
    }
}
