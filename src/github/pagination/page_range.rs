//! Bounded, restartable sequence of page numbers.

use std::ops::RangeInclusive;

use crate::github::error::BrowseError;

/// Closed range of page numbers `start..=end`.
///
/// The range is a value: iterating consumes a copy, so the same range can
/// be walked any number of times.
///
/// ```
/// use branchwatch::github::pagination::PageRange;
///
/// let range = PageRange::new(2, 4).expect("valid range");
/// assert_eq!(range.iter().collect::<Vec<_>>(), vec![2, 3, 4]);
/// assert_eq!(range.into_iter().count(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    /// Creates a range from `start` to `end`, inclusive.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidPageRange` when `start` is zero or
    /// greater than `end`.
    pub fn new(start: u32, end: u32) -> Result<Self, BrowseError> {
        if start == 0 || start > end {
            return Err(BrowseError::InvalidPageRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First page in the range.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Last page in the range.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Number of pages in the range.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Always false: a range holds at least one page.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns true if `page` lies within the range.
    #[must_use]
    pub const fn contains(&self, page: u32) -> bool {
        page >= self.start && page <= self.end
    }

    /// Iterates the page numbers without consuming the range.
    #[must_use]
    pub const fn iter(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl IntoIterator for PageRange {
    type Item = u32;
    type IntoIter = RangeInclusive<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &PageRange {
    type Item = u32;
    type IntoIter = RangeInclusive<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
