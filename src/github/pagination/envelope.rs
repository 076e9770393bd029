//! Page metadata and the page-of-data wrapper built from it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::page_range::PageRange;
use crate::github::error::{BrowseError, RemoteFailure};

/// Current page paired with the total page count.
///
/// Envelopes are immutable: a new position means a new envelope.
///
/// # Example
///
/// ```
/// use branchwatch::github::pagination::PageEnvelope;
///
/// let envelope = PageEnvelope::new(2, 5).expect("page 2 of 5 is valid");
/// assert_eq!(envelope.page_num(), 2);
/// assert_eq!(envelope.total_num_pages(), 5);
/// assert!(!envelope.is_first_page());
/// assert!(!envelope.is_last_page());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEnvelope {
    page_num: u32,
    total_num_pages: u32,
}

impl PageEnvelope {
    /// Creates an envelope for `page_num` of `total_num_pages`.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidPageEnvelope` when `page_num` is zero.
    pub fn new(page_num: u32, total_num_pages: u32) -> Result<Self, BrowseError> {
        if page_num == 0 {
            return Err(BrowseError::InvalidPageEnvelope {
                message: "page number must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            page_num,
            total_num_pages,
        })
    }

    /// Builds an envelope from textual page values, as found in query
    /// strings.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::NotNumeric` when either value is not an
    /// unsigned integer, or the errors of [`PageEnvelope::new`].
    pub fn parse(page_num: &str, total_num_pages: &str) -> Result<Self, BrowseError> {
        let page = parse_page_field("pageNum", page_num)?;
        let total = parse_page_field("totalNumPages", total_num_pages)?;
        Self::new(page, total)
    }

    /// Current page number (1-based).
    #[must_use]
    pub const fn page_num(&self) -> u32 {
        self.page_num
    }

    /// Total number of pages available.
    #[must_use]
    pub const fn total_num_pages(&self) -> u32 {
        self.total_num_pages
    }

    /// Returns true if this is the first page.
    #[must_use]
    pub const fn is_first_page(&self) -> bool {
        self.page_num == 1
    }

    /// Returns true if no page follows this one.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        self.page_num >= self.total_num_pages
    }

    /// All page numbers `1..=total`, or `None` when there are no pages.
    #[must_use]
    pub fn pages(&self) -> Option<PageRange> {
        PageRange::new(1, self.total_num_pages).ok()
    }
}

pub(super) fn parse_page_field(field: &'static str, raw: &str) -> Result<u32, BrowseError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| BrowseError::NotNumeric {
            field,
            value: raw.to_owned(),
        })
}

/// One page of domain records together with its [`PageEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<T> {
    envelope: PageEnvelope,
    page_data: Vec<T>,
}

impl<T> PagedResult<T> {
    /// Wraps already-typed records.
    #[must_use]
    pub const fn new(envelope: PageEnvelope, page_data: Vec<T>) -> Self {
        Self {
            envelope,
            page_data,
        }
    }

    /// Page metadata.
    #[must_use]
    pub const fn envelope(&self) -> PageEnvelope {
        self.envelope
    }

    /// Current page number (1-based).
    #[must_use]
    pub const fn page_num(&self) -> u32 {
        self.envelope.page_num()
    }

    /// Total number of pages available.
    #[must_use]
    pub const fn total_num_pages(&self) -> u32 {
        self.envelope.total_num_pages()
    }

    /// Records on this page.
    #[must_use]
    pub fn page_data(&self) -> &[T] {
        &self.page_data
    }

    /// Consumes the result, returning the records.
    #[must_use]
    pub fn into_page_data(self) -> Vec<T> {
        self.page_data
    }

    /// Converts each record, keeping the envelope.
    #[must_use]
    pub fn map<U>(self, convert: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            envelope: self.envelope,
            page_data: self.page_data.into_iter().map(convert).collect(),
        }
    }
}

impl<T: DeserializeOwned> PagedResult<T> {
    /// Validates that `body` is a JSON array and deserialises its elements.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::NotASequence` when `body` is not an array, or
    /// `BrowseError::Remote` with a decode failure when an element does not
    /// match `T`.
    pub fn from_json(envelope: PageEnvelope, body: Value) -> Result<Self, BrowseError> {
        let Value::Array(items) = body else {
            let found = json_kind(&body);
            tracing::warn!("page data is not a sequence: found {found}");
            return Err(BrowseError::NotASequence { found });
        };

        let page_data = items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|error| {
                tracing::warn!("page element deserialisation failed: {error}");
                BrowseError::Remote {
                    operation: "decode page".to_owned(),
                    kind: RemoteFailure::Decode,
                }
            })?;

        Ok(Self::new(envelope, page_data))
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{PageEnvelope, PagedResult};
    use crate::github::error::BrowseError;

    #[rstest]
    fn envelope_rejects_page_zero() {
        let result = PageEnvelope::new(0, 3);
        assert!(
            matches!(result, Err(BrowseError::InvalidPageEnvelope { .. })),
            "expected InvalidPageEnvelope, got {result:?}"
        );
    }

    #[rstest]
    #[case::page("two", "5", "pageNum")]
    #[case::total("2", "five", "totalNumPages")]
    #[case::negative("-1", "5", "pageNum")]
    fn parse_rejects_non_numeric_fields(
        #[case] page: &str,
        #[case] total: &str,
        #[case] expected_field: &str,
    ) {
        let result = PageEnvelope::parse(page, total);
        match result {
            Err(BrowseError::NotNumeric { field, .. }) => {
                assert_eq!(field, expected_field, "wrong field reported");
            }
            other => panic!("expected NotNumeric, got {other:?}"),
        }
    }

    #[rstest]
    fn parse_accepts_numeric_text() {
        let envelope = PageEnvelope::parse("3", " 7 ").expect("numeric text should parse");
        assert_eq!(envelope, PageEnvelope::new(3, 7).expect("valid envelope"));
    }

    #[rstest]
    #[case::only(1, 1, true, true)]
    #[case::first(1, 4, true, false)]
    #[case::middle(2, 4, false, false)]
    #[case::last(4, 4, false, true)]
    fn envelope_reports_its_position(
        #[case] page: u32,
        #[case] total: u32,
        #[case] first: bool,
        #[case] last: bool,
    ) {
        let envelope = PageEnvelope::new(page, total).expect("valid envelope");
        assert_eq!(envelope.is_first_page(), first, "first page");
        assert_eq!(envelope.is_last_page(), last, "last page");
    }

    #[rstest]
    fn envelope_with_no_pages_has_no_range() {
        let envelope = PageEnvelope::new(1, 0).expect("empty total is allowed");
        assert!(envelope.pages().is_none(), "no pages expected");
        assert!(envelope.is_last_page());
    }

    #[rstest]
    fn paged_result_reads_back_its_inputs() {
        let envelope = PageEnvelope::new(2, 4).expect("valid envelope");
        let result = PagedResult::new(envelope, vec!["a", "b"]);

        assert_eq!(result.page_num(), 2);
        assert_eq!(result.total_num_pages(), 4);
        assert_eq!(result.page_data(), ["a", "b"]);
    }

    #[rstest]
    #[case::object(json!({"sha": "abc"}), "an object")]
    #[case::string(json!("abc"), "a string")]
    #[case::null(json!(null), "null")]
    fn from_json_rejects_non_sequences(
        #[case] body: serde_json::Value,
        #[case] found: &'static str,
    ) {
        let envelope = PageEnvelope::new(1, 1).expect("valid envelope");
        let result = PagedResult::<serde_json::Value>::from_json(envelope, body);
        assert_eq!(result, Err(BrowseError::NotASequence { found }));
    }

    #[rstest]
    fn from_json_deserialises_elements() {
        let envelope = PageEnvelope::new(1, 1).expect("valid envelope");
        let result = PagedResult::<u32>::from_json(envelope, json!([1, 2, 3]))
            .expect("array of numbers should decode");
        assert_eq!(result.into_page_data(), vec![1, 2, 3]);
    }
}
