//! Tracking input validation.
//!
//! Validators return a [`ValidationResult`] instead of an error so callers
//! can show the message next to the offending field.

use serde::{Deserialize, Serialize};

use super::juz::TOTAL_PAGES;
use super::surah::{verse_count, TOTAL_SURAHS};

/// Outcome of validating one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True if the input is acceptable.
    pub valid: bool,
    /// Reason the input was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    /// An accepted input.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    /// A rejected input.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }

    fn and_then(self, next: impl FnOnce() -> Self) -> Self {
        if self.valid { next() } else { self }
    }
}

/// Checks that `surah` is between 1 and 114.
#[must_use]
pub fn validate_surah(surah: u32) -> ValidationResult {
    if (1..=TOTAL_SURAHS).contains(&surah) {
        ValidationResult::ok()
    } else {
        ValidationResult::invalid(format!(
            "Surah number must be between 1 and {TOTAL_SURAHS}"
        ))
    }
}

/// Checks that `verse` exists in `surah`.
#[must_use]
pub fn validate_verse(surah: u32, verse: u32) -> ValidationResult {
    validate_surah(surah).and_then(|| match verse_count(surah) {
        Some(count) if (1..=count).contains(&verse) => ValidationResult::ok(),
        Some(count) => ValidationResult::invalid(format!(
            "Surah {surah} has {count} verses, verse {verse} does not exist"
        )),
        None => ValidationResult::invalid(format!("Unknown surah {surah}")),
    })
}

/// Checks that `page` is between 1 and 604.
#[must_use]
pub fn validate_page(page: u32) -> ValidationResult {
    if (1..=TOTAL_PAGES).contains(&page) {
        ValidationResult::ok()
    } else {
        ValidationResult::invalid(format!("Page number must be between 1 and {TOTAL_PAGES}"))
    }
}

/// Checks both ends of a verse range. Backward ranges are valid.
#[must_use]
pub fn validate_verse_range(
    surah_from: u32,
    verse_from: u32,
    surah_to: u32,
    verse_to: u32,
) -> ValidationResult {
    validate_verse(surah_from, verse_from).and_then(|| validate_verse(surah_to, verse_to))
}

/// Checks both ends of a page range. Backward ranges are valid.
#[must_use]
pub fn validate_page_range(page_from: u32, page_to: u32) -> ValidationResult {
    validate_page(page_from).and_then(|| validate_page(page_to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, true)]
    #[case(114, true)]
    #[case(0, false)]
    #[case(115, false)]
    fn test_validate_surah(#[case] surah: u32, #[case] valid: bool) {
        assert_eq!(validate_surah(surah).valid, valid);
    }

    #[rstest]
    #[case(1, 7, true)]
    #[case(1, 8, false)]
    #[case(2, 286, true)]
    #[case(2, 0, false)]
    #[case(115, 1, false)]
    fn test_validate_verse(#[case] surah: u32, #[case] verse: u32, #[case] valid: bool) {
        assert_eq!(validate_verse(surah, verse).valid, valid);
    }

    #[test]
    fn test_invalid_result_carries_message() {
        let result = validate_verse(1, 8);
        assert!(!result.valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Surah 1 has 7 verses, verse 8 does not exist")
        );
        assert_eq!(validate_page(605).error.as_deref(), Some("Page number must be between 1 and 604"));
    }

    #[test]
    fn test_backward_ranges_are_valid() {
        assert_eq!(validate_verse_range(2, 10, 2, 5), ValidationResult::ok());
        assert_eq!(validate_page_range(50, 10), ValidationResult::ok());
    }

    #[test]
    fn test_range_reports_first_failure() {
        let result = validate_verse_range(0, 1, 2, 999);
        assert_eq!(
            result.error.as_deref(),
            Some("Surah number must be between 1 and 114")
        );

        let result = validate_page_range(1, 0);
        assert!(!result.valid);
    }
}
