//! Quran memorization tracking.
//!
//! Pure range arithmetic over the fixed Juz and surah tables, plus the
//! content API client used to resolve verse pages.

pub mod calculator;
pub mod client;
pub mod error;
pub mod juz;
pub mod source;
pub mod surah;
pub mod validation;

#[cfg(test)]
mod calculator_props;

pub use calculator::{
    compute_juz_by_pages, compute_pages, compute_surahs, QuranMetrics, QuranTrackingCalculator,
    TrackingRange,
};
pub use client::{Chapter, ImageQuality, QuranApiClient};
pub use error::QuranApiError;
pub use juz::{covered_juz, juz_for_page, JuzPageRange, JUZ_PAGE_RANGES, TOTAL_JUZ, TOTAL_PAGES};
pub use source::{QuranContentSource, StaticContentSource};
pub use surah::{verse_count, SURAH_VERSE_COUNTS, TOTAL_SURAHS, TOTAL_VERSES};
pub use validation::{
    validate_page, validate_page_range, validate_surah, validate_verse, validate_verse_range,
    ValidationResult,
};
