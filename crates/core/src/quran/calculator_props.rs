//! Property-based tests for the tracking calculator.

use proptest::prelude::*;

use super::calculator::{compute_juz_by_pages, compute_pages, compute_surahs};
use super::juz::{juz_for_page, JUZ_PAGE_RANGES, TOTAL_PAGES};

proptest! {
    #[test]
    fn prop_pages_symmetric(a in 0u32..10_000, b in 0u32..10_000) {
        prop_assert_eq!(compute_pages(a, b), compute_pages(b, a));
    }

    #[test]
    fn prop_surahs_symmetric(a in 1u32..=114, b in 1u32..=114) {
        prop_assert_eq!(compute_surahs(a, b), compute_surahs(b, a));
        prop_assert!(compute_surahs(a, b) <= 114);
    }

    #[test]
    fn prop_juz_symmetric(a in 1u32..=TOTAL_PAGES, b in 1u32..=TOTAL_PAGES) {
        prop_assert_eq!(compute_juz_by_pages(a, b), compute_juz_by_pages(b, a));
    }

    #[test]
    fn prop_single_page_is_one_juz(page in 1u32..=TOTAL_PAGES) {
        prop_assert_eq!(compute_juz_by_pages(page, page), 1);
    }

    /// The Juz count equals the distinct Juz of every page in the range.
    #[test]
    fn prop_juz_count_matches_page_walk(a in 1u32..=TOTAL_PAGES, b in 1u32..=TOTAL_PAGES) {
        let (low, high) = (a.min(b), a.max(b));
        let mut walked: Vec<u32> = (low..=high).filter_map(juz_for_page).collect();
        walked.dedup();
        prop_assert_eq!(compute_juz_by_pages(a, b) as usize, walked.len());
    }

    #[test]
    fn prop_every_page_in_exactly_one_juz(page in 1u32..=TOTAL_PAGES) {
        let containing = JUZ_PAGE_RANGES.iter().filter(|r| r.contains(page)).count();
        prop_assert_eq!(containing, 1);
    }
}
