//! Invoice calculation service.
//!
//! Pure business logic with no persistence: fee resolution, line item
//! construction, totals and payment application.

use chrono::{Days, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use super::error::InvoiceError;
use super::types::{
    AdjustmentType, FeeBreakdown, FeeCategory, GuardianFeeAdjustment, Invoice, InvoiceLineItem,
    InvoiceStatus, InvoiceTotals, StudentEnrollment,
};
use madrasah_shared::{InvoiceId, InvoiceLineItemId};

/// Days between invoice date and due date.
pub const PAYMENT_TERM_DAYS: u64 = 14;

/// Monetary precision of invoice amounts.
const AMOUNT_DP: u32 = 2;

/// Invoice calculation service.
pub struct InvoiceService;

impl InvoiceService {
    /// Due date for an invoice issued on `invoice_date`.
    #[must_use]
    pub fn due_date(invoice_date: NaiveDate) -> NaiveDate {
        invoice_date
            .checked_add_days(Days::new(PAYMENT_TERM_DAYS))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Rounds an amount to cents using Banker's Rounding.
    #[must_use]
    pub fn round_amount(amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(AMOUNT_DP, RoundingStrategy::MidpointNearestEven)
    }

    /// Resolves the fees charged for one student.
    ///
    /// Active categories are charged at their default amount, in the given
    /// order. Adjustments are matched by exact category name: `Exclude`
    /// drops the category and `CustomAmount` replaces its amount.
    ///
    /// # Errors
    ///
    /// Returns an error if a resulting amount is negative or a custom-amount
    /// adjustment has no amount.
    pub fn resolve_fee_breakdown(
        categories: &[FeeCategory],
        adjustments: &[GuardianFeeAdjustment],
    ) -> Result<FeeBreakdown, InvoiceError> {
        let mut breakdown = FeeBreakdown::new();

        for category in categories.iter().filter(|c| c.is_active) {
            let adjustment = adjustments
                .iter()
                .find(|a| a.category_name == category.name);

            let amount = match adjustment {
                Some(adj) if adj.adjustment_type == AdjustmentType::Exclude => continue,
                Some(adj) => adj
                    .custom_amount
                    .ok_or_else(|| InvoiceError::MissingCustomAmount(category.name.clone()))?,
                None => category.amount,
            };

            if amount < Decimal::ZERO {
                return Err(InvoiceError::NegativeFeeAmount {
                    category: category.name.clone(),
                    amount,
                });
            }

            breakdown.insert(category.name.clone(), Self::round_amount(amount));
        }

        Ok(breakdown)
    }

    /// Builds the line item for one student. `total_amount` is the exact
    /// sum of the breakdown.
    #[must_use]
    pub fn build_line_item(
        invoice_id: InvoiceId,
        student: &StudentEnrollment,
        fee_breakdown: FeeBreakdown,
    ) -> InvoiceLineItem {
        InvoiceLineItem {
            id: InvoiceLineItemId::new(),
            invoice_id,
            student_id: student.student_id,
            student_name: student.student_name.clone(),
            grade_name: student.grade_name.clone(),
            total_amount: fee_breakdown.total(),
            fee_breakdown,
        }
    }

    /// Computes invoice totals from its line items.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidDiscount` if the discount is negative
    /// or larger than the subtotal.
    pub fn calculate_totals(
        line_items: &[InvoiceLineItem],
        discount: Decimal,
        amount_paid: Decimal,
    ) -> Result<InvoiceTotals, InvoiceError> {
        let subtotal =
            Self::round_amount(line_items.iter().map(|item| item.total_amount).sum());
        let discount = Self::round_amount(discount);

        if discount < Decimal::ZERO || discount > subtotal {
            return Err(InvoiceError::InvalidDiscount { discount, subtotal });
        }

        let total = subtotal - discount;
        Ok(InvoiceTotals {
            subtotal,
            discount,
            total,
            balance_due: total - amount_paid,
        })
    }

    /// Derives the settlement status from the amount paid.
    #[must_use]
    pub fn status_for(total: Decimal, amount_paid: Decimal) -> InvoiceStatus {
        if amount_paid <= Decimal::ZERO {
            InvoiceStatus::Unpaid
        } else if amount_paid >= total {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        }
    }

    /// Applies totals to an invoice header, refreshing its status.
    pub fn apply_totals(invoice: &mut Invoice, totals: InvoiceTotals) {
        invoice.subtotal = totals.subtotal;
        invoice.discount = totals.discount;
        invoice.total = totals.total;
        invoice.balance_due = totals.balance_due;
        invoice.status = Self::status_for(invoice.total, invoice.amount_paid);
    }

    /// Records a payment against an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or exceeds the
    /// balance due.
    pub fn record_payment(invoice: &Invoice, amount: Decimal) -> Result<Invoice, InvoiceError> {
        let amount = Self::round_amount(amount);
        if amount <= Decimal::ZERO {
            return Err(InvoiceError::NonPositivePayment(amount));
        }
        if amount > invoice.balance_due {
            return Err(InvoiceError::Overpayment {
                amount,
                balance_due: invoice.balance_due,
            });
        }

        let mut updated = invoice.clone();
        updated.amount_paid += amount;
        updated.balance_due = updated.total - updated.amount_paid;
        updated.status = Self::status_for(updated.total, updated.amount_paid);

        tracing::info!(
            invoice_number = %updated.invoice_number,
            %amount,
            balance_due = %updated.balance_due,
            status = updated.status.as_str(),
            "Payment recorded"
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::types::PaymentPlan;
    use chrono::Utc;
    use madrasah_shared::{
        AcademicTermId, FeeCategoryId, GradeId, GuardianId, StudentId, TenantId, UserId,
    };
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn category(grade_id: GradeId, name: &str, amount: Decimal) -> FeeCategory {
        FeeCategory {
            id: FeeCategoryId::new(),
            grade_id,
            name: name.to_string(),
            amount,
            is_active: true,
        }
    }

    fn adjustment(
        name: &str,
        adjustment_type: AdjustmentType,
        custom_amount: Option<Decimal>,
    ) -> GuardianFeeAdjustment {
        GuardianFeeAdjustment {
            guardian_id: GuardianId::new(),
            academic_term_id: AcademicTermId::new(),
            category_name: name.to_string(),
            adjustment_type,
            custom_amount,
        }
    }

    fn invoice(total: Decimal, amount_paid: Decimal) -> Invoice {
        let today = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        Invoice {
            id: InvoiceId::new(),
            tenant_id: TenantId::new(),
            guardian_id: GuardianId::new(),
            academic_term_id: AcademicTermId::new(),
            invoice_number: "INV-2025-T1-0001".to_string(),
            invoice_date: today,
            due_date: InvoiceService::due_date(today),
            payment_plan: PaymentPlan::Full,
            subtotal: total,
            discount: Decimal::ZERO,
            total,
            amount_paid,
            balance_due: total - amount_paid,
            status: InvoiceService::status_for(total, amount_paid),
            notes: None,
            generated_by: UserId::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_due_date_is_fourteen_days_later() {
        let issued = NaiveDate::from_ymd_opt(2025, 1, 25).unwrap();
        assert_eq!(
            InvoiceService::due_date(issued),
            NaiveDate::from_ymd_opt(2025, 2, 8).unwrap()
        );
    }

    #[test]
    fn test_breakdown_keeps_category_order() {
        let grade = GradeId::new();
        let categories = vec![
            category(grade, "Tuition", dec!(35000)),
            category(grade, "Transport", dec!(10000)),
            category(grade, "Library", dec!(500)),
        ];

        let breakdown = InvoiceService::resolve_fee_breakdown(&categories, &[]).unwrap();
        let names: Vec<&str> = breakdown.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Tuition", "Transport", "Library"]);
        assert_eq!(breakdown.total(), dec!(45500));
    }

    #[test]
    fn test_inactive_categories_are_skipped() {
        let grade = GradeId::new();
        let mut lab = category(grade, "Lab", dec!(2000));
        lab.is_active = false;
        let categories = vec![category(grade, "Tuition", dec!(35000)), lab];

        let breakdown = InvoiceService::resolve_fee_breakdown(&categories, &[]).unwrap();
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown.get("Lab"), None);
    }

    #[test]
    fn test_exclude_adjustment_removes_category() {
        let grade = GradeId::new();
        let categories = vec![
            category(grade, "Tuition", dec!(35000)),
            category(grade, "Transport", dec!(10000)),
        ];
        let adjustments = vec![adjustment("Transport", AdjustmentType::Exclude, None)];

        let breakdown =
            InvoiceService::resolve_fee_breakdown(&categories, &adjustments).unwrap();
        assert_eq!(breakdown.get("Transport"), None);
        assert_eq!(breakdown.total(), dec!(35000));
    }

    #[test]
    fn test_custom_amount_overrides_default() {
        let grade = GradeId::new();
        let categories = vec![category(grade, "Tuition", dec!(35000))];
        let adjustments = vec![adjustment(
            "Tuition",
            AdjustmentType::CustomAmount,
            Some(dec!(17500)),
        )];

        let breakdown =
            InvoiceService::resolve_fee_breakdown(&categories, &adjustments).unwrap();
        assert_eq!(breakdown.get("Tuition"), Some(dec!(17500)));
    }

    #[test]
    fn test_adjustment_matches_by_exact_name() {
        let grade = GradeId::new();
        let categories = vec![category(grade, "School Transport", dec!(10000))];
        let adjustments = vec![adjustment("Transport", AdjustmentType::Exclude, None)];

        let breakdown =
            InvoiceService::resolve_fee_breakdown(&categories, &adjustments).unwrap();
        assert_eq!(breakdown.get("School Transport"), Some(dec!(10000)));
    }

    #[test]
    fn test_negative_custom_amount_rejected() {
        let grade = GradeId::new();
        let categories = vec![category(grade, "Tuition", dec!(35000))];
        let adjustments = vec![adjustment(
            "Tuition",
            AdjustmentType::CustomAmount,
            Some(dec!(-1)),
        )];

        let result = InvoiceService::resolve_fee_breakdown(&categories, &adjustments);
        assert!(matches!(result, Err(InvoiceError::NegativeFeeAmount { .. })));
    }

    #[test]
    fn test_custom_amount_without_value_rejected() {
        let grade = GradeId::new();
        let categories = vec![category(grade, "Tuition", dec!(35000))];
        let adjustments = vec![adjustment("Tuition", AdjustmentType::CustomAmount, None)];

        let result = InvoiceService::resolve_fee_breakdown(&categories, &adjustments);
        assert!(matches!(result, Err(InvoiceError::MissingCustomAmount(_))));
    }

    #[test]
    fn test_line_item_total_matches_breakdown() {
        let grade = GradeId::new();
        let categories = vec![
            category(grade, "Tuition", dec!(35000.125)),
            category(grade, "Transport", dec!(10000.10)),
        ];
        let breakdown = InvoiceService::resolve_fee_breakdown(&categories, &[]).unwrap();
        let student = StudentEnrollment {
            student_id: StudentId::new(),
            student_name: "Aisha".to_string(),
            grade_id: grade,
            grade_name: "Grade 3".to_string(),
        };

        let item = InvoiceService::build_line_item(InvoiceId::new(), &student, breakdown);
        assert_eq!(item.total_amount, item.fee_breakdown.total());
        assert_eq!(item.total_amount, dec!(45000.22));
    }

    #[test]
    fn test_totals_with_discount() {
        let student = StudentEnrollment {
            student_id: StudentId::new(),
            student_name: "Yusuf".to_string(),
            grade_id: GradeId::new(),
            grade_name: "Grade 1".to_string(),
        };
        let mut breakdown = FeeBreakdown::new();
        breakdown.insert("Tuition", dec!(80000));
        let items = vec![InvoiceService::build_line_item(
            InvoiceId::new(),
            &student,
            breakdown,
        )];

        let totals = InvoiceService::calculate_totals(&items, dec!(5000), Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, dec!(80000));
        assert_eq!(totals.total, dec!(75000));
        assert_eq!(totals.balance_due, dec!(75000));
    }

    #[rstest]
    #[case(dec!(-1))]
    #[case(dec!(100.01))]
    fn test_invalid_discount_rejected(#[case] discount: Decimal) {
        let student = StudentEnrollment {
            student_id: StudentId::new(),
            student_name: "Maryam".to_string(),
            grade_id: GradeId::new(),
            grade_name: "Grade 2".to_string(),
        };
        let mut breakdown = FeeBreakdown::new();
        breakdown.insert("Tuition", dec!(100));
        let items = vec![InvoiceService::build_line_item(
            InvoiceId::new(),
            &student,
            breakdown,
        )];

        let result = InvoiceService::calculate_totals(&items, discount, Decimal::ZERO);
        assert!(matches!(result, Err(InvoiceError::InvalidDiscount { .. })));
    }

    #[rstest]
    #[case(dec!(0), InvoiceStatus::Unpaid)]
    #[case(dec!(100), InvoiceStatus::PartiallyPaid)]
    #[case(dec!(500), InvoiceStatus::Paid)]
    fn test_status_for(#[case] paid: Decimal, #[case] expected: InvoiceStatus) {
        assert_eq!(InvoiceService::status_for(dec!(500), paid), expected);
    }

    #[test]
    fn test_record_partial_then_full_payment() {
        let original = invoice(dec!(80000), Decimal::ZERO);

        let partial = InvoiceService::record_payment(&original, dec!(30000)).unwrap();
        assert_eq!(partial.amount_paid, dec!(30000));
        assert_eq!(partial.balance_due, dec!(50000));
        assert_eq!(partial.status, InvoiceStatus::PartiallyPaid);

        let settled = InvoiceService::record_payment(&partial, dec!(50000)).unwrap();
        assert_eq!(settled.balance_due, Decimal::ZERO);
        assert_eq!(settled.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_record_payment_rejects_bad_amounts() {
        let original = invoice(dec!(1000), dec!(400));

        assert!(matches!(
            InvoiceService::record_payment(&original, Decimal::ZERO),
            Err(InvoiceError::NonPositivePayment(_))
        ));
        assert!(matches!(
            InvoiceService::record_payment(&original, dec!(600.01)),
            Err(InvoiceError::Overpayment { .. })
        ));
    }
}
