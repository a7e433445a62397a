//! Filters and pagination for note listings.

/// Page size used when the caller gives none or an out-of-range one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Optional constraints applied when listing a user's notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
    /// Pull request number recorded on the note's reference.
    pub pr_number: Option<u64>,
    /// State of at least one associated pull request.
    pub pr_state: Option<String>,
}

impl NoteFilter {
    /// Drops blank text criteria so they do not constrain the query.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            search: non_blank(self.search),
            pr_number: self.pr_number,
            pr_state: non_blank(self.pr_state),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// A 1-based page of results.
///
/// Invalid inputs fall back to defaults instead of failing: a missing or zero
/// page becomes page 1, and a missing, zero or oversized limit becomes
/// [`DEFAULT_PAGE_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Normalises raw page parameters.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        let page_number = page.filter(|value| *value > 0).unwrap_or(1);
        let page_size = limit
            .filter(|value| (1..=MAX_PAGE_SIZE).contains(value))
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self {
            page: page_number,
            limit: page_size,
        }
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of rows on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page).saturating_sub(1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{DEFAULT_PAGE_SIZE, NoteFilter, PageRequest};

    #[rstest]
    #[case::defaults(None, None, 1, DEFAULT_PAGE_SIZE, 0)]
    #[case::explicit(Some(3), Some(20), 3, 20, 40)]
    #[case::zero_page(Some(0), Some(5), 1, 5, 0)]
    #[case::zero_limit(Some(2), Some(0), 2, DEFAULT_PAGE_SIZE, 10)]
    #[case::oversized_limit(Some(1), Some(101), 1, DEFAULT_PAGE_SIZE, 0)]
    #[case::max_limit(Some(2), Some(100), 2, 100, 100)]
    #[case::last_page(Some(u32::MAX), Some(100), u32::MAX, 100, 429_496_729_400)]
    fn page_request_normalises_inputs(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
        #[case] expected_offset: u64,
    ) {
        let request = PageRequest::new(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
        assert_eq!(request.offset(), expected_offset);
    }

    #[rstest]
    fn blank_filters_are_dropped() {
        let filter = NoteFilter {
            search: Some("   ".to_owned()),
            pr_number: Some(5),
            pr_state: Some(" closed ".to_owned()),
        }
        .normalised();

        assert_eq!(
            filter,
            NoteFilter {
                search: None,
                pr_number: Some(5),
                pr_state: Some("closed".to_owned()),
            }
        );
    }
}
