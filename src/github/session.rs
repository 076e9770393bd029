//! Explicit session state for talking to a GitHub host.
//!
//! A [`Session`] carries the API base URL and the optional token. There is
//! no process-wide client: gateways are built from a session and dropped
//! with it when the user signs out.

use url::Url;

use super::error::BrowseError;
use super::locator::PersonalAccessToken;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// API base plus credentials for one signed-in (or anonymous) user.
///
/// # Example
///
/// ```
/// use branchwatch::github::Session;
///
/// let session = Session::for_host("https://ghe.example.com", None)
///     .expect("should derive enterprise API base");
/// assert_eq!(session.api_base().as_str(), "https://ghe.example.com/api/v3");
/// assert!(!session.is_authenticated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    api_base: Url,
    token: Option<PersonalAccessToken>,
}

impl Session {
    /// Creates a session against the public `github.com` API.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidUrl` if the built-in API base fails to
    /// parse.
    pub fn github_com(token: Option<PersonalAccessToken>) -> Result<Self, BrowseError> {
        let api_base = Url::parse(GITHUB_API_BASE)
            .map_err(|error| BrowseError::InvalidUrl(error.to_string()))?;
        Ok(Self { api_base, token })
    }

    /// Creates a session for the host in `host_url`.
    ///
    /// `github.com` maps to the public API; any other host is treated as
    /// GitHub Enterprise and served from `/api/v3`.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidUrl` when the URL cannot be parsed or
    /// lacks a host.
    pub fn for_host(
        host_url: &str,
        token: Option<PersonalAccessToken>,
    ) -> Result<Self, BrowseError> {
        let parsed =
            Url::parse(host_url).map_err(|error| BrowseError::InvalidUrl(error.to_string()))?;
        let api_base = derive_api_base(&parsed)?;
        Ok(Self { api_base, token })
    }

    /// API base URL for this session.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Token for this session, if signed in.
    #[must_use]
    pub const fn token(&self) -> Option<&PersonalAccessToken> {
        self.token.as_ref()
    }

    /// Returns true when the session carries a token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Returns a copy of this session without credentials.
    #[must_use]
    pub fn signed_out(&self) -> Self {
        Self {
            api_base: self.api_base.clone(),
            token: None,
        }
    }
}

fn derive_api_base(parsed: &Url) -> Result<Url, BrowseError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| BrowseError::InvalidUrl("URL must include a host".to_owned()))?;

    if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("api.github.com") {
        return Url::parse(GITHUB_API_BASE)
            .map_err(|error| BrowseError::InvalidUrl(error.to_string()));
    }

    let mut api_url = Url::parse(&format!("{}://{host}", parsed.scheme()))
        .map_err(|error| BrowseError::InvalidUrl(error.to_string()))?;
    api_url
        .set_port(parsed.port())
        .map_err(|()| BrowseError::InvalidUrl("invalid port".to_owned()))?;
    api_url.set_path("api/v3");
    Ok(api_url)
}
