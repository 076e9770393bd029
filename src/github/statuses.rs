//! Commit status reporting and creation.
//!
//! [`StatusService`] validates textual input before any gateway call and
//! groups listed statuses by context into a [`StatusBoard`].

use super::error::BrowseError;
use super::gateway::StatusGateway;
use super::locator::{CommitRef, RepositoryName, RepositoryOwner};
use super::models::{CombinedStatus, CommitStatus, NewCommitStatus};

/// Context GitHub assigns to statuses created without one.
pub const DEFAULT_CONTEXT: &str = "default";

/// Statuses reported by one context, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStatuses {
    /// Context name.
    pub context: String,
    /// Statuses reported under the context.
    pub statuses: Vec<CommitStatus>,
}

impl ContextStatuses {
    /// Most recent status of the context.
    #[must_use]
    pub fn latest(&self) -> Option<&CommitStatus> {
        self.statuses.first()
    }
}

/// Every status of one commit, plus the same statuses grouped by context in
/// first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    commit: CommitRef,
    statuses: Vec<CommitStatus>,
    contexts: Vec<ContextStatuses>,
}

impl StatusBoard {
    /// Groups `statuses` of `commit` by context.
    #[must_use]
    pub fn new(commit: CommitRef, statuses: Vec<CommitStatus>) -> Self {
        let contexts = group_by_context(&statuses);
        Self {
            commit,
            statuses,
            contexts,
        }
    }

    /// Commit the statuses belong to.
    #[must_use]
    pub const fn commit(&self) -> &CommitRef {
        &self.commit
    }

    /// Statuses in the order GitHub listed them.
    #[must_use]
    pub fn statuses(&self) -> &[CommitStatus] {
        &self.statuses
    }

    /// Statuses grouped by context.
    #[must_use]
    pub fn contexts(&self) -> &[ContextStatuses] {
        &self.contexts
    }

    /// Returns a board with `created` added as the newest status.
    #[must_use]
    pub fn with_created(&self, created: CommitStatus) -> Self {
        let statuses: Vec<CommitStatus> = std::iter::once(created)
            .chain(self.statuses.iter().cloned())
            .collect();
        Self::new(self.commit.clone(), statuses)
    }
}

fn context_of(status: &CommitStatus) -> &str {
    status.context.as_deref().unwrap_or(DEFAULT_CONTEXT)
}

fn group_by_context(statuses: &[CommitStatus]) -> Vec<ContextStatuses> {
    let mut groups: Vec<ContextStatuses> = Vec::new();
    for status in statuses {
        let context = context_of(status);
        if let Some(group) = groups.iter_mut().find(|group| group.context == context) {
            group.statuses.push(status.clone());
            continue;
        }
        groups.push(ContextStatuses {
            context: context.to_owned(),
            statuses: vec![status.clone()],
        });
    }
    groups
}

/// Textual input for a status to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusRequest<'a> {
    /// Commit SHA to attach the status to.
    pub sha: &'a str,
    /// One of `pending`, `success`, `error`, or `failure`.
    pub state: &'a str,
    /// Short description.
    pub description: Option<&'a str>,
    /// Link to details.
    pub target_url: Option<&'a str>,
    /// Context label.
    pub context: Option<&'a str>,
}

/// Lists, summarises, and creates commit statuses through a gateway.
pub struct StatusService<'client, Gateway>
where
    Gateway: StatusGateway,
{
    client: &'client Gateway,
}

impl<'client, Gateway> StatusService<'client, Gateway>
where
    Gateway: StatusGateway,
{
    /// Create a new service using the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Lists the statuses of `commit_ref` grouped by context.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidCommitReference` for an empty reference
    /// without calling GitHub, and propagates gateway failures.
    pub async fn statuses_for_commit(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        commit_ref: &str,
    ) -> Result<StatusBoard, BrowseError> {
        let commit = CommitRef::new(commit_ref)?;
        let statuses = self
            .client
            .list_commit_statuses(owner, repository, &commit)
            .await?;
        Ok(StatusBoard::new(commit, statuses))
    }

    /// Fetches the combined state of `reference`.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidCommitReference` for an empty reference
    /// without calling GitHub, and propagates gateway failures.
    pub async fn combined_status(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        reference: &str,
    ) -> Result<CombinedStatus, BrowseError> {
        let commit = CommitRef::new(reference)?;
        self.client
            .combined_status(owner, repository, &commit)
            .await
    }

    /// Creates a status from textual input.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidCommitReference` or
    /// `BrowseError::InvalidStatusState` without calling GitHub, and
    /// propagates gateway failures.
    pub async fn create_commit_status(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        request: StatusRequest<'_>,
    ) -> Result<CommitStatus, BrowseError> {
        let status = NewCommitStatus::parse(request.sha, request.state)?
            .with_description(request.description)
            .with_target_url(request.target_url)
            .with_context(request.context);
        self.client
            .create_commit_status(owner, repository, &status)
            .await
    }
}
