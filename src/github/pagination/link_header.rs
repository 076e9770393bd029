//! Parsing of RFC 8288 `Link` headers into page metadata.
//!
//! GitHub advertises pagination as a comma-separated list of entries such
//! as `<https://api.github.com/...?page=5&per_page=30>; rel="last"`. Only
//! the `page` query parameter of each URL matters here; the total page
//! count comes from the `last` relation.

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded;

use super::envelope::{PageEnvelope, PagedResult, parse_page_field};
use crate::github::error::BrowseError;

const REL_MARKER: &str = "rel=\"";
const LAST_RELATION: &str = "last";

/// One relation from a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRelation {
    rel: String,
    url: String,
    page: Option<u32>,
}

impl LinkRelation {
    /// Relation name such as `next`, `prev`, `first`, or `last`.
    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Target URL as written in the header.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Value of the URL's `page` query parameter, if present.
    #[must_use]
    pub const fn page(&self) -> Option<u32> {
        self.page
    }
}

/// Splits a `Link` header into its relations.
///
/// Entries are separated by commas outside `<...>`, so a URL containing a
/// literal comma stays whole. Entries lacking angle brackets or a
/// `rel="..."` marker are skipped.
///
/// # Errors
///
/// Returns `BrowseError::NotNumeric` when an entry's `page` parameter is
/// not an unsigned integer.
pub fn parse_link_relations(header: &str) -> Result<Vec<LinkRelation>, BrowseError> {
    split_entries(header)
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parsed = split_entry(entry);
            if parsed.is_none() {
                tracing::debug!("skipping malformed link header entry `{entry}`");
            }
            parsed
        })
        .map(|(url, rel)| {
            let page = page_param(url)?;
            Ok(LinkRelation {
                rel: rel.to_owned(),
                url: url.to_owned(),
                page,
            })
        })
        .collect()
}

/// Derives the page envelope for a response to `requested_page`.
///
/// Without a header the response is a single page. With one, the total is
/// the page of the `last` relation, or `requested_page` when no `last`
/// relation is advertised (GitHub omits it on the final page).
///
/// # Errors
///
/// Returns `BrowseError::NotNumeric` for non-integer page parameters,
/// `BrowseError::MalformedLinkHeader` when the `last` relation has no page
/// parameter, and the errors of [`PageEnvelope::new`].
///
/// ```
/// use branchwatch::github::pagination::envelope_from_link_header;
///
/// let header = r#"<https://api/x?page=2>; rel="next", <https://api/x?page=5>; rel="last""#;
/// let envelope = envelope_from_link_header(Some(header), 1).expect("header should parse");
/// assert_eq!(envelope.page_num(), 1);
/// assert_eq!(envelope.total_num_pages(), 5);
/// ```
pub fn envelope_from_link_header(
    header: Option<&str>,
    requested_page: u32,
) -> Result<PageEnvelope, BrowseError> {
    let Some(raw) = header else {
        return PageEnvelope::new(requested_page, 1);
    };

    let relations = parse_link_relations(raw)?;
    let total = relations
        .iter()
        .find(|relation| relation.rel == LAST_RELATION)
        .map_or(Ok(requested_page), |last| {
            last.page.ok_or_else(|| BrowseError::MalformedLinkHeader {
                message: format!("`last` relation has no page parameter: {}", last.url),
            })
        })?;

    PageEnvelope::new(requested_page, total)
}

/// Wraps a raw JSON response body as a typed [`PagedResult`].
///
/// # Errors
///
/// Propagates the errors of [`envelope_from_link_header`] and
/// [`PagedResult::from_json`].
pub fn paged_result_from_response<T: DeserializeOwned>(
    body: Value,
    link_header: Option<&str>,
    requested_page: u32,
) -> Result<PagedResult<T>, BrowseError> {
    let envelope = envelope_from_link_header(link_header, requested_page)?;
    PagedResult::from_json(envelope, body)
}

fn split_entries(header: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut inside_url = false;
    for ch in header.chars() {
        match ch {
            '<' => inside_url = true,
            '>' => inside_url = false,
            ',' if !inside_url => {
                entries.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    entries.push(current);
    entries
}

fn split_entry(entry: &str) -> Option<(&str, &str)> {
    let (_, after_open) = entry.split_once('<')?;
    let (url, _) = after_open.split_once('>')?;
    let (_, after_marker) = entry.split_once(REL_MARKER)?;
    let (rel, _) = after_marker.split_once('"')?;
    Some((url, rel))
}

fn page_param(url: &str) -> Result<Option<u32>, BrowseError> {
    let Some((_, query)) = url.split_once('?') else {
        return Ok(None);
    };

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "page")
        .map(|(_, value)| parse_page_field("page", &value))
        .transpose()
}
