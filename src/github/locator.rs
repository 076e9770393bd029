//! Identity wrappers for owners, repositories, branches, commit references,
//! and tokens.

use std::fmt;

use super::error::BrowseError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner login is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::EmptyIdentifier` when the value is blank.
    pub fn new(value: &str) -> Result<Self, BrowseError> {
        non_empty(value, "repository owner").map(Self)
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::EmptyIdentifier` when the value is blank.
    pub fn new(value: &str) -> Result<Self, BrowseError> {
        non_empty(value, "repository name").map(Self)
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Branch name wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    /// Validates that the branch name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::EmptyIdentifier` when the value is blank.
    pub fn new(value: &str) -> Result<Self, BrowseError> {
        non_empty(value, "branch name").map(Self)
    }

    /// Borrow the branch name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A point in version history: commit SHA, branch name, or tag name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitRef(String);

impl CommitRef {
    /// Validates the reference is a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidCommitReference` when the reference is
    /// empty or whitespace.
    pub fn new(value: &str) -> Result<Self, BrowseError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BrowseError::InvalidCommitReference);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the reference.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the first seven characters, the conventional short SHA.
    #[must_use]
    pub fn short(&self) -> &str {
        short_sha(self.as_str())
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, BrowseError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BrowseError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(***)")
    }
}

/// Returns at most the first seven characters of a SHA.
#[must_use]
pub fn short_sha(sha: &str) -> &str {
    sha.char_indices()
        .nth(7)
        .and_then(|(end, _)| sha.get(..end))
        .unwrap_or(sha)
}

fn non_empty(value: &str, kind: &'static str) -> Result<String, BrowseError> {
    if value.trim().is_empty() {
        return Err(BrowseError::EmptyIdentifier { kind });
    }
    Ok(value.to_owned())
}
