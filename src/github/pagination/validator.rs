//! Validation of requested page numbers against a known page total.

/// Returns true if `requested` may be fetched given `total_num_pages`.
///
/// Page 1 is always fetchable, even before any total is known. Any other
/// page must be at least 1 and no greater than a known total. A `None`
/// total means no page beyond the first can be validated.
///
/// ```
/// use branchwatch::github::pagination::is_valid_page_request;
///
/// assert!(is_valid_page_request(1, None));
/// assert!(is_valid_page_request(3, Some(5)));
/// assert!(!is_valid_page_request(2, None));
/// assert!(!is_valid_page_request(6, Some(5)));
/// assert!(!is_valid_page_request(0, Some(5)));
/// ```
#[must_use]
pub fn is_valid_page_request(requested: i64, total_num_pages: Option<u32>) -> bool {
    if requested == 1 {
        return true;
    }

    if requested < 1 {
        tracing::debug!("page validation failed: requested page {requested} is less than 1");
        return false;
    }

    let Some(total) = total_num_pages else {
        tracing::debug!("page validation failed: total page count is unknown");
        return false;
    };

    if requested > i64::from(total) {
        tracing::debug!(
            "page validation failed: requested page {requested} exceeds total {total}"
        );
        return false;
    }

    true
}
