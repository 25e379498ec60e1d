//! Entity re-exports.

pub use super::academic_terms::Entity as AcademicTerms;
pub use super::employees::Entity as Employees;
pub use super::fee_categories::Entity as FeeCategories;
pub use super::grades::Entity as Grades;
pub use super::guardian_fee_adjustments::Entity as GuardianFeeAdjustments;
pub use super::guardians::Entity as Guardians;
pub use super::invoice_line_items::Entity as InvoiceLineItems;
pub use super::invoices::Entity as Invoices;
pub use super::students::Entity as Students;
pub use super::tenants::Entity as Tenants;
