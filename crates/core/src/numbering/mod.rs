//! Human-readable identifier sequences scoped by tenant and year or term.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::NumberingError;
pub use service::{IdentifierRepository, NumberingService};
pub use types::{IdentifierKind, SequenceScope};
