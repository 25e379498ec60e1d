//! Juz to page partition of the 604-page Madani mushaf.

use serde::{Deserialize, Serialize};

/// Number of pages in the mushaf.
pub const TOTAL_PAGES: u32 = 604;

/// Number of Juz.
pub const TOTAL_JUZ: u32 = 30;

/// Inclusive page range of one Juz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuzPageRange {
    /// Juz number, 1 to 30.
    pub juz: u32,
    /// First page.
    pub start_page: u32,
    /// Last page.
    pub end_page: u32,
}

impl JuzPageRange {
    const fn new(juz: u32, start_page: u32, end_page: u32) -> Self {
        Self {
            juz,
            start_page,
            end_page,
        }
    }

    /// Number of pages in the Juz.
    #[must_use]
    pub const fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    /// Returns true if `page` falls inside the Juz.
    #[must_use]
    pub const fn contains(&self, page: u32) -> bool {
        self.start_page <= page && page <= self.end_page
    }

    /// Returns true if the Juz shares at least one page with `[low, high]`.
    #[must_use]
    pub const fn overlaps(&self, low: u32, high: u32) -> bool {
        self.start_page <= high && low <= self.end_page
    }
}

/// The 30 Juz page ranges, in order. Together they cover pages 1 to 604
/// with no gaps or overlaps.
pub const JUZ_PAGE_RANGES: [JuzPageRange; 30] = [
    JuzPageRange::new(1, 1, 21),
    JuzPageRange::new(2, 22, 41),
    JuzPageRange::new(3, 42, 61),
    JuzPageRange::new(4, 62, 81),
    JuzPageRange::new(5, 82, 101),
    JuzPageRange::new(6, 102, 121),
    JuzPageRange::new(7, 122, 141),
    JuzPageRange::new(8, 142, 161),
    JuzPageRange::new(9, 162, 181),
    JuzPageRange::new(10, 182, 201),
    JuzPageRange::new(11, 202, 221),
    JuzPageRange::new(12, 222, 241),
    JuzPageRange::new(13, 242, 261),
    JuzPageRange::new(14, 262, 281),
    JuzPageRange::new(15, 282, 301),
    JuzPageRange::new(16, 302, 321),
    JuzPageRange::new(17, 322, 341),
    JuzPageRange::new(18, 342, 361),
    JuzPageRange::new(19, 362, 381),
    JuzPageRange::new(20, 382, 401),
    JuzPageRange::new(21, 402, 421),
    JuzPageRange::new(22, 422, 441),
    JuzPageRange::new(23, 442, 461),
    JuzPageRange::new(24, 462, 481),
    JuzPageRange::new(25, 482, 501),
    JuzPageRange::new(26, 502, 521),
    JuzPageRange::new(27, 522, 541),
    JuzPageRange::new(28, 542, 561),
    JuzPageRange::new(29, 562, 581),
    JuzPageRange::new(30, 582, 604),
];

/// Juz containing `page`, or `None` outside 1..=604.
#[must_use]
pub fn juz_for_page(page: u32) -> Option<u32> {
    JUZ_PAGE_RANGES
        .iter()
        .find(|range| range.contains(page))
        .map(|range| range.juz)
}

/// Juz numbers sharing at least one page with the range, in either direction.
#[must_use]
pub fn covered_juz(ranges: &[JuzPageRange], page_from: u32, page_to: u32) -> Vec<u32> {
    let (low, high) = (page_from.min(page_to), page_from.max(page_to));
    ranges
        .iter()
        .filter(|range| range.overlaps(low, high))
        .map(|range| range.juz)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ranges_partition_all_pages() {
        let mut expected_start = 1;
        for (index, range) in JUZ_PAGE_RANGES.iter().enumerate() {
            assert_eq!(range.juz as usize, index + 1);
            assert_eq!(range.start_page, expected_start);
            assert!(range.end_page >= range.start_page);
            expected_start = range.end_page + 1;
        }
        assert_eq!(expected_start, TOTAL_PAGES + 1);

        let total: u32 = JUZ_PAGE_RANGES.iter().map(JuzPageRange::page_count).sum();
        assert_eq!(total, TOTAL_PAGES);
        assert_eq!(JUZ_PAGE_RANGES.len() as u32, TOTAL_JUZ);
    }

    #[rstest]
    #[case(1, Some(1))]
    #[case(21, Some(1))]
    #[case(22, Some(2))]
    #[case(301, Some(15))]
    #[case(581, Some(29))]
    #[case(582, Some(30))]
    #[case(604, Some(30))]
    #[case(0, None)]
    #[case(605, None)]
    fn test_juz_for_page(#[case] page: u32, #[case] expected: Option<u32>) {
        assert_eq!(juz_for_page(page), expected);
    }

    #[test]
    fn test_covered_juz_crosses_boundary() {
        assert_eq!(covered_juz(&JUZ_PAGE_RANGES, 20, 23), vec![1, 2]);
        assert_eq!(covered_juz(&JUZ_PAGE_RANGES, 23, 20), vec![1, 2]);
        assert_eq!(covered_juz(&JUZ_PAGE_RANGES, 600, 600), vec![30]);
    }
}
