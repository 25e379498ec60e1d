//! Identifier kinds and sequence scopes.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::NumberingError;

/// Record types that carry a yearly sequence identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Student admission number (`STU-25-001`).
    Student,
    /// Guardian number (`PAR-25-001`).
    Guardian,
    /// Employee number (`EMP-25-001`).
    Employee,
}

impl IdentifierKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Student, Self::Guardian, Self::Employee];

    /// Identifier prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Student => "STU",
            Self::Guardian => "PAR",
            Self::Employee => "EMP",
        }
    }

    /// Zero-padding width of the counter segment.
    #[must_use]
    pub const fn padding(self) -> usize {
        3
    }

    /// Table holding the identifier column.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Student => "students",
            Self::Guardian => "guardians",
            Self::Employee => "employees",
        }
    }

    /// Column holding the identifier.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Student => "admission_number",
            Self::Guardian => "guardian_number",
            Self::Employee => "employee_number",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Guardian => write!(f, "guardian"),
            Self::Employee => write!(f, "employee"),
        }
    }
}

impl std::str::FromStr for IdentifierKind {
    type Err = NumberingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "guardian" | "parent" => Ok(Self::Guardian),
            "employee" => Ok(Self::Employee),
            _ => Err(NumberingError::UnknownKind(s.to_string())),
        }
    }
}

/// A counter partition: every identifier in the scope shares
/// `{prefix}-{year_token}-` and differs only in the trailing counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceScope {
    prefix: String,
    year_token: String,
    padding: usize,
}

impl SequenceScope {
    /// Creates a scope from its parts.
    #[must_use]
    pub fn new(prefix: impl Into<String>, year_token: impl Into<String>, padding: usize) -> Self {
        Self {
            prefix: prefix.into(),
            year_token: year_token.into(),
            padding,
        }
    }

    /// Scope for a yearly record identifier: two-digit year, e.g. `STU-25-`.
    #[must_use]
    pub fn for_kind(kind: IdentifierKind, date: NaiveDate) -> Self {
        Self::new(
            kind.prefix(),
            format!("{:02}", date.year().rem_euclid(100)),
            kind.padding(),
        )
    }

    /// Scope for invoice numbers: full year and term, e.g. `INV-2025-T1-`.
    #[must_use]
    pub fn for_invoice(year: i32, term_number: u32) -> Self {
        Self::new("INV", format!("{year:04}-T{term_number}"), 4)
    }

    /// The shared leading text of every identifier in this scope.
    #[must_use]
    pub fn pattern_prefix(&self) -> String {
        format!("{}-{}-", self.prefix, self.year_token)
    }

    /// Number of `-`-delimited parts a well-formed identifier has.
    fn expected_parts(&self) -> usize {
        self.pattern_prefix().split('-').count()
    }

    /// Formats a counter into a full identifier.
    ///
    /// Counters wider than the padding are written in full.
    #[must_use]
    pub fn format(&self, counter: u32) -> String {
        format!(
            "{}{:0width$}",
            self.pattern_prefix(),
            counter,
            width = self.padding
        )
    }

    /// Parses the trailing counter of an identifier.
    ///
    /// Malformed identifiers (too few segments, non-numeric counter) yield 0.
    #[must_use]
    pub fn parse_counter(&self, identifier: &str) -> u32 {
        let parts: Vec<&str> = identifier.split('-').collect();
        if parts.len() < self.expected_parts() {
            tracing::warn!(identifier, "Malformed identifier, counting as 0");
            return 0;
        }

        parts
            .last()
            .and_then(|segment| segment.parse::<u32>().ok())
            .unwrap_or_else(|| {
                tracing::warn!(identifier, "Non-numeric identifier counter, counting as 0");
                0
            })
    }

    /// Returns the counter that follows the highest one among `existing`.
    ///
    /// Identifiers outside this scope are ignored.
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::CounterOverflow` if the counter cannot grow.
    pub fn next_counter<S: AsRef<str>>(&self, existing: &[S]) -> Result<u32, NumberingError> {
        let prefix = self.pattern_prefix();
        let max = existing
            .iter()
            .map(AsRef::as_ref)
            .filter(|identifier| identifier.starts_with(&prefix))
            .map(|identifier| self.parse_counter(identifier))
            .max()
            .unwrap_or(0);

        max.checked_add(1)
            .ok_or(NumberingError::CounterOverflow(prefix))
    }

    /// Returns the next identifier after `existing`.
    ///
    /// # Errors
    ///
    /// Returns `NumberingError::CounterOverflow` if the counter cannot grow.
    pub fn next_identifier<S: AsRef<str>>(&self, existing: &[S]) -> Result<String, NumberingError> {
        Ok(self.format(self.next_counter(existing)?))
    }
}

impl std::fmt::Display for SequenceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern_prefix())
    }
}
