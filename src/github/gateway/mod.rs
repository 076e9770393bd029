//! Gateways for browsing repositories and commit statuses through Octocrab.
//!
//! The traits are the seam the orchestrator and CLI depend on, so tests can
//! substitute mocks; [`OctocrabGateway`] implements both against a real
//! GitHub (or GitHub Enterprise) API.

mod client;
mod error_mapping;
mod http_utils;
mod repository;
mod routes;
mod status;

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::github::error::BrowseError;
use crate::github::locator::{BranchName, CommitRef, RepositoryName, RepositoryOwner};
use crate::github::models::{
    AuthenticatedUser, BranchSummary, CombinedStatus, Commit, CommitStatus, NewCommitStatus,
    RepositorySummary,
};
use crate::github::pagination::PagedResult;
use crate::github::session::Session;

use client::build_octocrab_client;

/// Gateway for repository, branch, and commit listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Fetch the user the session token belongs to.
    async fn authenticated_user(&self) -> Result<AuthenticatedUser, BrowseError>;

    /// Fetch every repository owned by `owner`.
    async fn list_repositories(
        &self,
        owner: &RepositoryOwner,
    ) -> Result<Vec<RepositorySummary>, BrowseError>;

    /// Fetch every branch of a repository.
    async fn list_branches(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
    ) -> Result<Vec<BranchSummary>, BrowseError>;

    /// Fetch one page of commits reachable from `branch`.
    async fn list_commits(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        branch: &BranchName,
        page: u32,
    ) -> Result<PagedResult<Commit>, BrowseError>;
}

/// Gateway for commit statuses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusGateway: Send + Sync {
    /// Fetch every status reported against `commit`, newest first.
    async fn list_commit_statuses(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        commit: &CommitRef,
    ) -> Result<Vec<CommitStatus>, BrowseError>;

    /// Fetch the combined state of `commit`.
    async fn combined_status(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        commit: &CommitRef,
    ) -> Result<CombinedStatus, BrowseError>;

    /// Report a new status against a commit.
    async fn create_commit_status(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        status: &NewCommitStatus,
    ) -> Result<CommitStatus, BrowseError>;
}

/// Octocrab-backed gateway bound to one [`Session`].
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a gateway for the session's API base and token.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::InvalidUrl` when the API base cannot be used as
    /// a URI, or `BrowseError::Remote` when Octocrab fails to construct a
    /// client.
    pub fn for_session(session: &Session) -> Result<Self, BrowseError> {
        build_octocrab_client(session).map(Self::new)
    }
}
