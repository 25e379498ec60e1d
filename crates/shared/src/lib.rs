//! Shared configuration, errors, and typed IDs for Madrasah.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod error_tests;

pub use config::{AppConfig, DatabaseConfig, NumberingConfig, QuranApiConfig};
pub use error::{AppError, AppResult};
pub use types::id::{
    AcademicTermId, EmployeeId, FeeCategoryId, GradeId, GuardianId, InvoiceId, InvoiceLineItemId,
    StudentId, TenantId, UserId,
};
