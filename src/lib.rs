//! Branchwatch library crate for browsing GitHub repositories.
//!
//! The library wraps Octocrab to list an owner's repositories, drill into
//! branches and paginated commit histories, and report or create commit
//! statuses. Fetched data is merged into a normalised local store, commit
//! pagination is validated against per-branch cursors, and failures
//! surface as [`BrowseError`] values that the CLI can display.

pub mod config;
pub mod github;
pub mod logging;
pub mod telemetry;

pub use config::{BranchwatchConfig, OperationMode};
pub use github::{
    BrowseError, CommitPageLoad, OctocrabGateway, PageEnvelope, PageRange, PersonalAccessToken,
    RemoteFailure, RepoStore, RepositoryBrowser, RepositoryGateway, Session, StatusBoard,
    StatusGateway, StatusRequest, StatusService,
};
