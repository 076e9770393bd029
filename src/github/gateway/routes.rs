//! Request paths relative to the API base.

use url::form_urlencoded;

use crate::github::locator::{BranchName, CommitRef, RepositoryName, RepositoryOwner};

pub(super) const PER_PAGE: &str = "100";

pub(super) fn owner_repositories(owner: &RepositoryOwner) -> String {
    format!("/users/{}/repos", owner.as_str())
}

pub(super) fn branches(owner: &RepositoryOwner, repository: &RepositoryName) -> String {
    format!("/repos/{}/{}/branches", owner.as_str(), repository.as_str())
}

pub(super) fn commits_page(
    owner: &RepositoryOwner,
    repository: &RepositoryName,
    branch: &BranchName,
    page: u32,
) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("sha", branch.as_str())
        .append_pair("page", &page.to_string())
        .finish();
    format!(
        "/repos/{}/{}/commits?{query}",
        owner.as_str(),
        repository.as_str()
    )
}

pub(super) fn commit_statuses(
    owner: &RepositoryOwner,
    repository: &RepositoryName,
    commit: &CommitRef,
) -> String {
    format!(
        "/repos/{}/{}/commits/{}/statuses",
        owner.as_str(),
        repository.as_str(),
        commit.as_str()
    )
}

pub(super) fn combined_status(
    owner: &RepositoryOwner,
    repository: &RepositoryName,
    commit: &CommitRef,
) -> String {
    format!(
        "/repos/{}/{}/commits/{}/status",
        owner.as_str(),
        repository.as_str(),
        commit.as_str()
    )
}

pub(super) fn create_status(
    owner: &RepositoryOwner,
    repository: &RepositoryName,
    sha: &CommitRef,
) -> String {
    format!(
        "/repos/{}/{}/statuses/{}",
        owner.as_str(),
        repository.as_str(),
        sha.as_str()
    )
}
