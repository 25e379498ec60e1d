//! Repository implementations of the core persistence traits.
//!
//! Every repository call runs inside a transaction scoped to the tenant via
//! the RLS context (see [`crate::rls`]).

pub mod identifier;
pub mod invoice;

pub use identifier::{IdentifierRepository, identifier_constraint, map_identifier_insert_error};
pub use invoice::{DbInvoiceUnitOfWork, InvoiceRepository};

use sea_orm::{DbErr, SqlErr};

/// Returns true if `err` is a violation of the unique constraint `constraint`.
#[must_use]
pub fn is_unique_violation(err: &DbErr, constraint: &str) -> bool {
    matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains(constraint)
    )
}
