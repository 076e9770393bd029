//! Pagination for GitHub list endpoints.
//!
//! This module turns `Link` response headers into [`PageEnvelope`] metadata,
//! wraps pages of records as [`PagedResult`], validates requested page
//! numbers, and tracks the last known position per branch.

mod cursor;
mod envelope;
mod link_header;
mod page_range;
mod validator;

pub use cursor::{BranchKey, PaginationCursors};
pub use envelope::{PageEnvelope, PagedResult};
pub use link_header::{
    LinkRelation, envelope_from_link_header, paged_result_from_response, parse_link_relations,
};
pub use page_range::PageRange;
pub use validator::is_valid_page_request;
