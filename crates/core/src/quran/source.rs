//! Content lookups consumed by the tracking calculator.

use std::future::Future;

use super::juz::{JuzPageRange, JUZ_PAGE_RANGES};

/// Quran structure lookups.
///
/// Implementations never fail: an unavailable lookup yields `None` (or the
/// static table) and the calculator degrades the affected metric.
pub trait QuranContentSource: Send + Sync {
    /// Juz page ranges, in Juz order.
    fn juz_page_ranges(&self) -> impl Future<Output = Vec<JuzPageRange>> + Send;

    /// Mushaf page of a verse, if it can be resolved.
    fn page_for_ayah(&self, surah: u32, verse: u32) -> impl Future<Output = Option<u32>> + Send;
}

/// Offline source: the static Juz table and no verse lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContentSource;

impl QuranContentSource for StaticContentSource {
    async fn juz_page_ranges(&self) -> Vec<JuzPageRange> {
        JUZ_PAGE_RANGES.to_vec()
    }

    async fn page_for_ayah(&self, _surah: u32, _verse: u32) -> Option<u32> {
        None
    }
}
