//! Repository, branch, and commit listings over Octocrab.
//!
//! Repository and branch lists are small enough to fetch in full. Commits
//! are fetched one page at a time through the raw response API so the
//! `Link` header reaches the pagination parser.

use async_trait::async_trait;
use http::StatusCode;
use http::Uri;
use http::header::LINK;
use octocrab::Page;

use crate::github::error::{BrowseError, RemoteFailure};
use crate::github::locator::{BranchName, RepositoryName, RepositoryOwner};
use crate::github::models::{
    ApiBranch, ApiCommit, ApiRepository, ApiUser, AuthenticatedUser, BranchSummary, Commit,
    RepositorySummary,
};
use crate::github::pagination::{PagedResult, paged_result_from_response};

use super::error_mapping::{map_decode_error, map_http_error, map_octocrab_error};
use super::http_utils::{extract_github_message, header_to_string};
use super::{OctocrabGateway, RepositoryGateway, routes};


const AUTHENTICATED_USER: &str = "authenticated user";
const LIST_REPOSITORIES: &str = "list repositories";
const LIST_BRANCHES: &str = "list branches";
const LIST_COMMITS: &str = "list commits";

#[async_trait]
impl RepositoryGateway for OctocrabGateway {
    async fn authenticated_user(&self) -> Result<AuthenticatedUser, BrowseError> {
        let user = self
            .client
            .get::<ApiUser, _, _>("/user", None::<&()>)
            .await
            .map_err(|error| map_octocrab_error(AUTHENTICATED_USER, &error))?;

        user.into_authenticated().ok_or_else(|| {
            tracing::warn!("{AUTHENTICATED_USER} response has no login");
            BrowseError::Remote {
                operation: AUTHENTICATED_USER.to_owned(),
                kind: RemoteFailure::Decode,
            }
        })
    }

    async fn list_repositories(
        &self,
        owner: &RepositoryOwner,
    ) -> Result<Vec<RepositorySummary>, BrowseError> {
        let page = self
            .client
            .get::<Page<ApiRepository>, _, _>(
                routes::owner_repositories(owner),
                Some(&[("per_page", routes::PER_PAGE)]),
            )
            .await
            .map_err(|error| map_octocrab_error(LIST_REPOSITORIES, &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|repositories| {
                repositories
                    .into_iter()
                    .map(RepositorySummary::from)
                    .collect()
            })
            .map_err(|error| map_octocrab_error(LIST_REPOSITORIES, &error))
    }

    async fn list_branches(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
    ) -> Result<Vec<BranchSummary>, BrowseError> {
        let page = self
            .client
            .get::<Page<ApiBranch>, _, _>(
                routes::branches(owner, repository),
                Some(&[("per_page", routes::PER_PAGE)]),
            )
            .await
            .map_err(|error| map_octocrab_error(LIST_BRANCHES, &error))?;

        self.client
            .all_pages(page)
            .await
            .map(|branches| branches.into_iter().map(BranchSummary::from).collect())
            .map_err(|error| map_octocrab_error(LIST_BRANCHES, &error))
    }

    async fn list_commits(
        &self,
        owner: &RepositoryOwner,
        repository: &RepositoryName,
        branch: &BranchName,
        page: u32,
    ) -> Result<PagedResult<Commit>, BrowseError> {
        let uri: Uri = routes::commits_page(owner, repository, branch, page)
            .parse::<Uri>()
            .map_err(|error| BrowseError::InvalidUrl(error.to_string()))?;

        let response = self
            .client
            ._get_with_headers(uri, None)
            .await
            .map_err(|error| map_octocrab_error(LIST_COMMITS, &error))?;

        let status = response.status();
        let link = header_to_string(response.headers().get(LINK));
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| map_octocrab_error(LIST_COMMITS, &error))?;

        if status != StatusCode::OK {
            return Err(map_http_error(
                LIST_COMMITS,
                status,
                extract_github_message(&body),
            ));
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|error| map_decode_error(LIST_COMMITS, &error))?;
        let paged = paged_result_from_response::<ApiCommit>(value, link.as_deref(), page)?;
        Ok(paged.map(Commit::from))
    }
}
