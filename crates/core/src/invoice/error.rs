//! Invoice error types.

use madrasah_shared::{AcademicTermId, AppError, GuardianId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::numbering::NumberingError;

/// Errors that can occur during invoice generation and payment recording.
#[derive(Debug, Error)]
pub enum InvoiceError {
    // ========== Generation Errors ==========
    /// The guardian already has an invoice for the term.
    #[error("Guardian {guardian_id} already has an invoice for term {term_id}")]
    DuplicateInvoice {
        /// Guardian billed.
        guardian_id: GuardianId,
        /// Term billed.
        term_id: AcademicTermId,
    },

    /// The guardian has no active students to bill.
    #[error("Guardian {0} has no active students")]
    NoActiveStudents(GuardianId),

    /// The allocated invoice number was taken by a concurrent writer.
    #[error("Invoice number already taken: {0}")]
    NumberConflict(String),

    /// Invoice number could not be derived.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    // ========== Validation Errors ==========
    /// A fee amount is negative.
    #[error("Fee amount for {category} cannot be negative: {amount}")]
    NegativeFeeAmount {
        /// Fee category name.
        category: String,
        /// Offending amount.
        amount: Decimal,
    },

    /// A custom-amount adjustment carries no amount.
    #[error("Custom amount adjustment for {0} has no amount")]
    MissingCustomAmount(String),

    /// The discount is negative or exceeds the subtotal.
    #[error("Invalid discount {discount} for subtotal {subtotal}")]
    InvalidDiscount {
        /// Requested discount.
        discount: Decimal,
        /// Invoice subtotal.
        subtotal: Decimal,
    },

    /// A payment amount is zero or negative.
    #[error("Payment amount must be positive: {0}")]
    NonPositivePayment(Decimal),

    /// A payment exceeds the outstanding balance.
    #[error("Payment {amount} exceeds balance due {balance_due}")]
    Overpayment {
        /// Payment amount.
        amount: Decimal,
        /// Outstanding balance.
        balance_due: Decimal,
    },

    // ========== Database Errors ==========
    /// Persistence failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl InvoiceError {
    /// Creates a repository error from any displayable error.
    #[must_use]
    pub fn repository(err: impl std::fmt::Display) -> Self {
        Self::Repository(err.to_string())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateInvoice { .. } => "DUPLICATE_INVOICE",
            Self::NoActiveStudents(_) => "NO_ACTIVE_STUDENTS",
            Self::NumberConflict(_) => "INVOICE_NUMBER_CONFLICT",
            Self::Numbering(err) => err.error_code(),
            Self::NegativeFeeAmount { .. } => "NEGATIVE_FEE_AMOUNT",
            Self::MissingCustomAmount(_) => "MISSING_CUSTOM_AMOUNT",
            Self::InvalidDiscount { .. } => "INVALID_DISCOUNT",
            Self::NonPositivePayment(_) => "NON_POSITIVE_PAYMENT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeFeeAmount { .. }
            | Self::MissingCustomAmount(_)
            | Self::InvalidDiscount { .. }
            | Self::NonPositivePayment(_) => 400,
            Self::DuplicateInvoice { .. } | Self::NumberConflict(_) => 409,
            Self::NoActiveStudents(_) | Self::Overpayment { .. } => 422,
            Self::Numbering(_) | Self::Repository(_) => 500,
        }
    }

    /// Returns true if regenerating with a fresh invoice number may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NumberConflict(_))
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::Numbering(inner) => inner.into(),
            InvoiceError::DuplicateInvoice { .. } | InvoiceError::NumberConflict(_) => {
                Self::Conflict(err.to_string())
            }
            InvoiceError::NoActiveStudents(_) | InvoiceError::Overpayment { .. } => {
                Self::BusinessRule(err.to_string())
            }
            InvoiceError::NegativeFeeAmount { .. }
            | InvoiceError::MissingCustomAmount(_)
            | InvoiceError::InvalidDiscount { .. }
            | InvoiceError::NonPositivePayment(_) => Self::Validation(err.to_string()),
            InvoiceError::Repository(_) => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_number_conflicts_are_retryable() {
        assert!(InvoiceError::NumberConflict("INV-2025-T1-0001".into()).is_retryable());
        assert!(!InvoiceError::NoActiveStudents(GuardianId::new()).is_retryable());
        assert!(!InvoiceError::Numbering(NumberingError::Conflict("x".into())).is_retryable());
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = InvoiceError::DuplicateInvoice {
            guardian_id: GuardianId::new(),
            term_id: AcademicTermId::new(),
        };
        assert_eq!(err.error_code(), "DUPLICATE_INVOICE");
        assert_eq!(err.http_status_code(), 409);

        let app: AppError = err.into();
        assert_eq!(app.status_code(), 409);
    }

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let err = InvoiceError::NegativeFeeAmount {
            category: "Transport".into(),
            amount: dec!(-5),
        };
        assert_eq!(err.http_status_code(), 400);

        let app: AppError = err.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
