//! Error types exposed by the GitHub browsing layer.

use std::fmt;

use http::StatusCode;
use thiserror::Error;

/// Coarse category of a failed GitHub call.
///
/// The full diagnostic detail is logged where the failure is mapped; only
/// the category travels with the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteFailure {
    /// GitHub rejected the credentials (401/403).
    Authentication,
    /// GitHub refused the call because the rate limit is exhausted.
    RateLimited,
    /// GitHub answered with a non-success status.
    Status(StatusCode),
    /// The request never produced a response.
    Network,
    /// The response could not be decoded.
    Decode,
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication rejected"),
            Self::RateLimited => write!(f, "rate limit exceeded"),
            Self::Status(status) => write!(f, "status {status}"),
            Self::Network => write!(f, "network failure"),
            Self::Decode => write!(f, "unreadable response"),
        }
    }
}

/// Errors surfaced while validating input, merging state, or talking to
/// GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrowseError {
    /// A page field arrived as text that is not an integer.
    #[error("{field} must be numeric, got `{value}`")]
    NotNumeric {
        /// Name of the offending field.
        field: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// Page data was expected to be a sequence.
    #[error("page data must be a sequence, got {found}")]
    NotASequence {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// A page envelope was built with out-of-range values.
    #[error("invalid page envelope: {message}")]
    InvalidPageEnvelope {
        /// Description of the violated bound.
        message: String,
    },

    /// A page range was requested with inverted or zero bounds.
    #[error("invalid page range {start}..={end}")]
    InvalidPageRange {
        /// First page of the range.
        start: u32,
        /// Last page of the range.
        end: u32,
    },

    /// A `Link` header could not be interpreted.
    #[error("malformed link header: {message}")]
    MalformedLinkHeader {
        /// Description of the problem.
        message: String,
    },

    /// The requested page number failed validation against the cursor.
    ///
    /// Callers must not retry with the same page number.
    #[error("an invalid pagination page number was requested: {requested}")]
    InvalidPage {
        /// The page that was requested.
        requested: i64,
        /// Total pages known for the branch, if any.
        total_num_pages: Option<u32>,
    },

    /// A commit status state outside `pending|success|error|failure`.
    #[error("invalid commit status state `{value}`")]
    InvalidStatusState {
        /// The rejected state string.
        value: String,
    },

    /// A commit reference was empty.
    #[error("commit reference must not be empty")]
    InvalidCommitReference,

    /// An owner, repository, or branch name was empty.
    #[error("{kind} must not be empty")]
    EmptyIdentifier {
        /// Which identifier was empty.
        kind: &'static str,
    },

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The API host could not be parsed.
    #[error("GitHub URL is invalid: {0}")]
    InvalidUrl(String),

    /// The repository is not in the local store.
    ///
    /// Indicates the caller skipped loading the repository list.
    #[error("repository `{name}` is not loaded")]
    RepositoryNotFound {
        /// Repository name that was looked up.
        name: String,
    },

    /// The branch is not in the local store.
    ///
    /// Indicates the caller skipped loading the branch list.
    #[error("branch `{branch}` is not loaded for repository `{repository}`")]
    BranchNotFound {
        /// Repository that was searched.
        repository: String,
        /// Branch name that was looked up.
        branch: String,
    },

    /// GitHub responded with an error.
    #[error("{operation} failed: GitHub responded with an error ({kind})")]
    Remote {
        /// The operation that was attempted.
        operation: String,
        /// Category of the failure.
        kind: RemoteFailure,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl BrowseError {
    /// Returns true for construction and validation failures raised before
    /// any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotNumeric { .. }
                | Self::NotASequence { .. }
                | Self::InvalidPageEnvelope { .. }
                | Self::InvalidPageRange { .. }
                | Self::MalformedLinkHeader { .. }
                | Self::InvalidStatusState { .. }
                | Self::InvalidCommitReference
                | Self::EmptyIdentifier { .. }
                | Self::MissingToken
                | Self::InvalidUrl(_)
        )
    }

    /// Returns true when the error came back from GitHub.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}
