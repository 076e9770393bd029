//! Commit status listing and creation over Octocrab.

use async_trait::async_trait;
use octocrab::Page;

use crate::github::error::BrowseError;
use crate::github::locator::{CommitRef, RepositoryName, RepositoryOwner};
use crate::github::models::{
    ApiCombinedStatus, ApiCommitStatus, CombinedStatus, CommitStatus, NewCommitStatus,
};

use super::error_mapping::map_octocrab_error;
use super::{OctocrabGateway, StatusGateway, routes};

const LIST_STATUSES: &str = "list commit statuses";
const COMBINED_STATUS: &str = "combined status";
const CREATE_STATUS: &str = "create commit status";

#[async_trait]
impl StatusGateway for OctocrabGateway {
    async fn list_commit_statuses(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        commit: &CommitRef,
    ) -> Result<Vec<CommitStatus>, BrowseError> {
        let page = self
            .client
            .get::<Page<ApiCommitStatus>, _, _>(
                routes::commit_statuses(owner, repository, commit),
                Some(&[("per_page", routes::PER_PAGE)]),
            )
            .await
            .map_err(|error| map_octocrab_error(LIST_STATUSES, &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|statuses| statuses.into_iter().map(CommitStatus::from).collect())
            .map_err(|error| map_octocrab_error(LIST_STATUSES, &error))
    }

    async fn combined_status(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        commit: &CommitRef,
    ) -> Result<CombinedStatus, BrowseError> {
        self.client
            .get::<ApiCombinedStatus, _, _>(
                routes::combined_status(owner, repository, commit),
                None::<&()>,
            )
            .await
            .map(CombinedStatus::from)
            .map_err(|error| map_octocrab_error(COMBINED_STATUS, &error))
    }

    async fn create_commit_status(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        status: &NewCommitStatus,
    ) -> Result<CommitStatus, BrowseError> {
        let created: ApiCommitStatus = self
            .client
            .post(
                routes::create_status(owner, repository, status.sha()),
                Some(&status.payload()),
            )
            .await
            .map_err(|error| map_octocrab_error(CREATE_STATUS, &error))?;
        Ok(created.into())
    }
}
