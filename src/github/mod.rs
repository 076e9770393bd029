//! GitHub repository browsing.
//!
//! This module wraps Octocrab to list repositories, branches, and paginated
//! commit histories, keeps them in a normalised local store, and reports or
//! creates commit statuses. Errors are mapped into [`BrowseError`] so
//! callers can tell validation failures from remote ones without seeing
//! Octocrab internals.

pub mod browser;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod session;
pub mod statuses;
pub mod store;

pub use browser::{CommitPageLoad, RepositoryBrowser};
pub use error::{BrowseError, RemoteFailure};
pub use gateway::{OctocrabGateway, RepositoryGateway, StatusGateway};
pub use locator::{
    BranchName, CommitRef, PersonalAccessToken, RepositoryName, RepositoryOwner, short_sha,
};
pub use models::{
    AuthenticatedUser, BranchSummary, CombinedStatus, Commit, CommitStatus, NewCommitStatus,
    RepositorySummary, StatusState,
};
pub use pagination::{PageEnvelope, PageRange, PagedResult};
pub use session::Session;
pub use statuses::{StatusBoard, StatusRequest, StatusService};
pub use store::{Branch, RepoStore, Repository, StoreEvent};

#[cfg(test)]
pub use gateway::{MockRepositoryGateway, MockStatusGateway};
