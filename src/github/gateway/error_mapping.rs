//! Maps Octocrab and HTTP failures onto [`BrowseError::Remote`].
//!
//! Only a coarse [`RemoteFailure`] category is surfaced; the detailed GitHub
//! message is logged here.

use http::StatusCode;

use crate::github::error::{BrowseError, RemoteFailure};

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Rate limiting shows up as 403 or 429 with a message or documentation URL
/// that mentions the rate limit.
pub(super) fn is_rate_limit(
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit")
        || documentation_url.is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

fn classify_status(
    status: StatusCode,
    message: &str,
    documentation_url: Option<&str>,
) -> RemoteFailure {
    if is_rate_limit(status, message, documentation_url) {
        RemoteFailure::RateLimited
    } else if is_auth_failure(status) {
        RemoteFailure::Authentication
    } else {
        RemoteFailure::Status(status)
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> BrowseError {
    let kind = if let octocrab::Error::GitHub { source, .. } = error {
        tracing::warn!(
            "{operation} failed: GitHub returned {status} {message}",
            status = source.status_code,
            message = source.message
        );
        classify_status(
            source.status_code,
            &source.message,
            source.documentation_url.as_deref(),
        )
    } else if is_network_error(error) {
        tracing::warn!("{operation} failed: {error}");
        RemoteFailure::Network
    } else {
        tracing::warn!("{operation} failed: {error}");
        RemoteFailure::Decode
    };

    remote(operation, kind)
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> BrowseError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    tracing::warn!("{operation} failed: GitHub returned {status} {message}");
    remote(operation, classify_status(status, &message, None))
}

pub(super) fn map_decode_error(operation: &str, error: &serde_json::Error) -> BrowseError {
    tracing::warn!("{operation} response deserialisation failed: {error}");
    remote(operation, RemoteFailure::Decode)
}

fn remote(operation: &str, kind: RemoteFailure) -> BrowseError {
    BrowseError::Remote {
        operation: operation.to_owned(),
        kind,
    }
}
