//! Memorization metrics over verse and page ranges.
//!
//! Ranges may run backward (recitation from a later verse to an earlier
//! one); every metric is direction-agnostic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::juz::{covered_juz, JuzPageRange, JUZ_PAGE_RANGES};
use super::source::QuranContentSource;
use super::validation::validate_page_range;

/// Number of pages in a page range, inclusive.
#[must_use]
pub const fn compute_pages(page_from: u32, page_to: u32) -> u32 {
    page_from.abs_diff(page_to).saturating_add(1)
}

/// Number of surahs in a surah range, inclusive.
#[must_use]
pub const fn compute_surahs(surah_from: u32, surah_to: u32) -> u32 {
    surah_from.abs_diff(surah_to).saturating_add(1)
}

/// Number of Juz sharing at least one page with the range.
#[must_use]
pub fn compute_juz_by_pages(page_from: u32, page_to: u32) -> u32 {
    count_juz(&JUZ_PAGE_RANGES, page_from, page_to)
}

fn count_juz(ranges: &[JuzPageRange], page_from: u32, page_to: u32) -> u32 {
    u32::try_from(covered_juz(ranges, page_from, page_to).len()).unwrap_or(u32::MAX)
}

/// A tracking entry as recorded by a teacher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRange {
    /// Starting surah.
    pub surah_from: u32,
    /// Starting verse.
    pub verse_from: u32,
    /// Ending surah.
    pub surah_to: u32,
    /// Ending verse.
    pub verse_to: u32,
    /// Starting page, if recorded.
    pub page_from: Option<u32>,
    /// Ending page, if recorded.
    pub page_to: Option<u32>,
}

/// Derived memorization metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuranMetrics {
    /// Starting page, recorded or derived.
    pub page_from: Option<u32>,
    /// Ending page, recorded or derived.
    pub page_to: Option<u32>,
    /// Pages covered; 0 when pages are unknown.
    pub pages_memorized: u32,
    /// Surahs covered.
    pub surahs_memorized: u32,
    /// Juz touched; 0 when pages are unknown.
    pub juz_memorized: u32,
}

/// Computes tracking metrics, resolving missing pages through a content source.
pub struct QuranTrackingCalculator<S: QuranContentSource> {
    source: Arc<S>,
}

impl<S: QuranContentSource> QuranTrackingCalculator<S> {
    /// Creates a calculator over `source`.
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Looks up the pages of both range endpoints.
    ///
    /// Returns `None` if either lookup fails.
    pub async fn derive_pages_from_verses(
        &self,
        surah_from: u32,
        verse_from: u32,
        surah_to: u32,
        verse_to: u32,
    ) -> Option<(u32, u32)> {
        let page_from = self.source.page_for_ayah(surah_from, verse_from).await;
        let page_to = self.source.page_for_ayah(surah_to, verse_to).await;

        match (page_from, page_to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => {
                tracing::warn!(
                    from = %format!("{surah_from}:{verse_from}"),
                    to = %format!("{surah_to}:{verse_to}"),
                    "Could not derive pages from verses"
                );
                None
            }
        }
    }

    /// Computes every metric for a tracking entry.
    ///
    /// Missing or out-of-mushaf pages are derived from the verses first. If
    /// they remain unknown, page and Juz metrics are 0 while the surah metric
    /// is still computed.
    pub async fn compute_all_metrics(&self, range: &TrackingRange) -> QuranMetrics {
        let pages = match (range.page_from, range.page_to) {
            (Some(from), Some(to)) if validate_page_range(from, to).valid => Some((from, to)),
            (Some(from), Some(to)) => {
                tracing::warn!(from, to, "Ignoring recorded pages outside the mushaf");
                self.derive_pages_from_verses(
                    range.surah_from,
                    range.verse_from,
                    range.surah_to,
                    range.verse_to,
                )
                .await
            }
            _ => {
                self.derive_pages_from_verses(
                    range.surah_from,
                    range.verse_from,
                    range.surah_to,
                    range.verse_to,
                )
                .await
            }
        };

        let surahs_memorized = compute_surahs(range.surah_from, range.surah_to);

        let Some((page_from, page_to)) = pages else {
            return QuranMetrics {
                page_from: None,
                page_to: None,
                pages_memorized: 0,
                surahs_memorized,
                juz_memorized: 0,
            };
        };

        let ranges = self.source.juz_page_ranges().await;
        QuranMetrics {
            page_from: Some(page_from),
            page_to: Some(page_to),
            pages_memorized: compute_pages(page_from, page_to),
            surahs_memorized,
            juz_memorized: count_juz(&ranges, page_from, page_to),
        }
    }
}
