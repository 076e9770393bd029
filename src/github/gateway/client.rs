//! Octocrab client construction for a session.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::{BrowseError, RemoteFailure};
use crate::github::session::Session;

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the session's API base, authenticated when
/// the session carries a token.
///
/// # Errors
///
/// Returns `BrowseError::InvalidUrl` when the base URI cannot be parsed or
/// `BrowseError::Remote` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(session: &Session) -> Result<Octocrab, BrowseError> {
    let base_uri: Uri = session
        .api_base()
        .as_str()
        .parse::<Uri>()
        .map_err(|error| BrowseError::InvalidUrl(error.to_string()))?;

    let mut builder = Octocrab::builder();
    if let Some(token) = session.token() {
        builder = builder.personal_token(token.as_ref());
    }

    builder
        .base_uri(base_uri)
        .map_err(|error| {
            tracing::warn!("octocrab rejected base URI: {error}");
            BrowseError::Remote {
                operation: "build client".to_owned(),
                kind: RemoteFailure::Network,
            }
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
