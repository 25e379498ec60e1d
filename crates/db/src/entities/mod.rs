//! `SeaORM` entity definitions.

pub mod prelude;

pub mod academic_terms;
pub mod employees;
pub mod fee_categories;
pub mod grades;
pub mod guardian_fee_adjustments;
pub mod guardians;
pub mod invoice_line_items;
pub mod invoices;
pub mod sea_orm_active_enums;
pub mod students;
pub mod tenants;
