//! Records returned by the GitHub API and the request bodies sent to it.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::BrowseError;
use super::locator::CommitRef;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Repository metadata shown in listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositorySummary {
    /// Repository identifier.
    pub id: u64,
    /// Repository name, unique per owner.
    pub name: String,
    /// Owner login.
    pub owner: Option<String>,
    /// `owner/name` form.
    pub full_name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Default branch name.
    pub default_branch: Option<String>,
    /// Whether the repository is private.
    pub private: bool,
}

/// Branch metadata shown in listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSummary {
    /// Branch name, unique per repository.
    pub name: String,
    /// SHA of the branch head.
    pub head_sha: Option<String>,
    /// Whether branch protection is enabled.
    pub protected: bool,
}

/// A single commit as listed on a branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    /// Full commit SHA.
    pub sha: String,
    /// Commit message.
    pub message: Option<String>,
    /// Git author name.
    pub author_name: Option<String>,
    /// GitHub login of the author, when the email maps to an account.
    pub author_login: Option<String>,
    /// Author timestamp.
    pub authored_at: Option<DateTime<Utc>>,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
}

impl Commit {
    /// First line of the commit message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message
            .as_deref()
            .and_then(|message| message.lines().next())
            .unwrap_or_default()
    }
}

/// The user a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account login.
    pub login: String,
    /// Display name, if set.
    pub name: Option<String>,
}

/// State of a commit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Checks are still running.
    Pending,
    /// Checks passed.
    Success,
    /// Checks could not run.
    Error,
    /// Checks failed.
    Failure,
}

impl StatusState {
    /// Wire representation of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusState {
    type Err = BrowseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "failure" => Ok(Self::Failure),
            _ => Err(BrowseError::InvalidStatusState {
                value: value.to_owned(),
            }),
        }
    }
}

/// A status reported against a commit by one context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStatus {
    /// Status identifier.
    pub id: u64,
    /// Reported state.
    pub state: StatusState,
    /// Short description.
    pub description: Option<String>,
    /// Link to details.
    pub target_url: Option<String>,
    /// Label distinguishing this status from other systems' statuses.
    pub context: Option<String>,
    /// Login of the account that created the status.
    pub creator: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

/// Overall state of a commit across the latest status of each context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedStatus {
    /// Aggregate state.
    pub state: StatusState,
    /// Commit the statuses belong to.
    pub sha: String,
    /// Number of contexts reporting.
    pub total_count: u64,
    /// Latest status per context.
    pub statuses: Vec<CommitStatus>,
}

/// A commit status to create.
///
/// Optional fields that are empty after trimming are dropped so the request
/// body omits them.
///
/// ```
/// use branchwatch::github::models::NewCommitStatus;
///
/// let status = NewCommitStatus::parse("abc1234", "success")
///     .expect("valid status")
///     .with_description(Some("  "))
///     .with_context(Some("ci/build"));
/// assert_eq!(status.description(), None);
/// assert_eq!(status.context(), Some("ci/build"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommitStatus {
    sha: CommitRef,
    state: StatusState,
    description: Option<String>,
    target_url: Option<String>,
    context: Option<String>,
}

impl NewCommitStatus {
    /// Creates a status for `sha` in `state`.
    #[must_use]
    pub const fn new(sha: CommitRef, state: StatusState) -> Self {
        Self {
            sha,
            state,
            description: None,
            target_url: None,
            context: None,
        }
    }

    /// Validates textual input.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidCommitReference` for an empty SHA and
    /// `BrowseError::InvalidStatusState` for an unknown state.
    pub fn parse(sha: &str, state: &str) -> Result<Self, BrowseError> {
        let commit = CommitRef::new(sha)?;
        let parsed_state = state.parse::<StatusState>()?;
        Ok(Self::new(commit, parsed_state))
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = non_blank(description);
        self
    }

    /// Sets the target URL.
    #[must_use]
    pub fn with_target_url(mut self, target_url: Option<&str>) -> Self {
        self.target_url = non_blank(target_url);
        self
    }

    /// Sets the context label.
    #[must_use]
    pub fn with_context(mut self, context: Option<&str>) -> Self {
        self.context = non_blank(context);
        self
    }

    /// Commit the status is attached to.
    #[must_use]
    pub const fn sha(&self) -> &CommitRef {
        &self.sha
    }

    /// State to report.
    #[must_use]
    pub const fn state(&self) -> StatusState {
        self.state
    }

    /// Description, if set.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Target URL, if set.
    #[must_use]
    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Context label, if set.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub(super) fn payload(&self) -> ApiNewStatus<'_> {
        ApiNewStatus {
            state: self.state,
            description: self.description(),
            target_url: self.target_url(),
            context: self.context(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

#[derive(Debug, Clone, Serialize)]
pub(super) struct ApiNewStatus<'a> {
    pub(super) state: StatusState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) target_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) context: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
    pub(super) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) full_name: Option<String>,
    pub(super) description: Option<String>,
    pub(super) html_url: Option<String>,
    pub(super) default_branch: Option<String>,
    #[serde(default)]
    pub(super) private: bool,
    pub(super) owner: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranch {
    pub(super) name: String,
    pub(super) commit: Option<ApiShaRef>,
    #[serde(default)]
    pub(super) protected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiShaRef {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) html_url: Option<String>,
    pub(super) commit: Option<ApiGitCommit>,
    pub(super) author: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitCommit {
    pub(super) message: Option<String>,
    pub(super) author: Option<ApiGitActor>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitActor {
    pub(super) name: Option<String>,
    pub(super) date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitStatus {
    pub(super) id: u64,
    pub(super) state: StatusState,
    pub(super) description: Option<String>,
    pub(super) target_url: Option<String>,
    pub(super) context: Option<String>,
    pub(super) creator: Option<ApiUser>,
    pub(super) created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCombinedStatus {
    pub(super) state: StatusState,
    pub(super) sha: String,
    #[serde(default)]
    pub(super) total_count: u64,
    #[serde(default)]
    pub(super) statuses: Vec<ApiCommitStatus>,
}

impl From<ApiRepository> for RepositorySummary {
    fn from(value: ApiRepository) -> Self {
        Self {
            id: value.id,
            name: value.name,
            owner: value.owner.and_then(|owner| owner.login),
            full_name: value.full_name,
            description: value.description,
            html_url: value.html_url,
            default_branch: value.default_branch,
            private: value.private,
        }
    }
}

impl From<ApiBranch> for BranchSummary {
    fn from(value: ApiBranch) -> Self {
        Self {
            name: value.name,
            head_sha: value.commit.map(|commit| commit.sha),
            protected: value.protected,
        }
    }
}

impl From<ApiCommit> for Commit {
    fn from(value: ApiCommit) -> Self {
        let (message, git_author) = value
            .commit
            .map_or((None, None), |commit| (commit.message, commit.author));
        let (author_name, authored_at) =
            git_author.map_or((None, None), |actor| (actor.name, actor.date));

        Self {
            sha: value.sha,
            message,
            author_name,
            author_login: value.author.and_then(|user| user.login),
            authored_at,
            html_url: value.html_url,
        }
    }
}

impl From<ApiCommitStatus> for CommitStatus {
    fn from(value: ApiCommitStatus) -> Self {
        Self {
            id: value.id,
            state: value.state,
            description: value.description,
            target_url: value.target_url,
            context: value.context,
            creator: value.creator.and_then(|user| user.login),
            created_at: value.created_at,
        }
    }
}

impl From<ApiCombinedStatus> for CombinedStatus {
    fn from(value: ApiCombinedStatus) -> Self {
        Self {
            state: value.state,
            sha: value.sha,
            total_count: value.total_count,
            statuses: value.statuses.into_iter().map(CommitStatus::from).collect(),
        }
    }
}

impl ApiUser {
    pub(super) fn into_authenticated(self) -> Option<AuthenticatedUser> {
        let login = self.login?;
        Some(AuthenticatedUser {
            login,
            name: self.name,
        })
    }
}
