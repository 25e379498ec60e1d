//! Fee invoice generation.
//!
//! One invoice per guardian and academic term, with one line item per
//! active student. Each line item carries the student's fee breakdown
//! (category name to amount) after guardian-specific adjustments.

pub mod error;
pub mod generator;
pub mod service;
pub mod types;


pub use error::InvoiceError;
pub use generator::{InvoiceGenerator, InvoiceStore, InvoiceUnitOfWork};
pub use service::{InvoiceService, PAYMENT_TERM_DAYS};
pub use types::*;
