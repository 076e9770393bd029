//! Shared test utilities for CLI tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use branchwatch::github::models::test_support::{
    branch_named, create_commits, repository_named, status_for_context,
};
use branchwatch::github::models::{
    AuthenticatedUser, BranchSummary, CombinedStatus, Commit, CommitStatus, NewCommitStatus,
    RepositorySummary, StatusState,
};
use branchwatch::github::{
    BranchName, CommitRef, PagedResult, RepositoryName, RepositoryOwner, StatusGateway,
};
use branchwatch::{BrowseError, PageEnvelope, RepositoryGateway};

/// In-memory gateway serving one repository tree and recording every call.
#[derive(Clone, Default)]
pub struct FakeGateway {
    /// Repositories returned for any owner.
    pub repositories: Vec<RepositorySummary>,
    /// Branches returned for any repository.
    pub branches: Vec<BranchSummary>,
    /// Total commit pages reported for every branch.
    pub total_pages: u32,
    /// Statuses returned for any commit.
    pub statuses: Vec<CommitStatus>,
    /// Error returned by every commit listing, if set.
    pub commit_failure: Option<BrowseError>,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

impl FakeGateway {
    /// Gateway with `hello` (default branch `main`) and three commit pages.
    pub fn with_repository_tree() -> Self {
        Self {
            repositories: vec![repository_named("hello"), repository_named("world")],
            branches: vec![branch_named("main"), branch_named("dev")],
            total_pages: 3,
            statuses: vec![
                status_for_context(2, "ci/build", StatusState::Success),
                status_for_context(1, "ci/build", StatusState::Pending),
            ],
            ..Self::default()
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex should be available").clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .expect("calls mutex should be available")
            .push(call);
    }
}

#[async_trait]
impl RepositoryGateway for FakeGateway {
    async fn authenticated_user(&self) -> Result<AuthenticatedUser, BrowseError> {
        self.record("authenticated user".to_owned());
        Ok(AuthenticatedUser {
            login: "octocat".to_owned(),
            name: None,
        })
    }

    async fn list_repositories(
        &self,
        owner: &RepositoryOwner,
    ) -> Result<Vec<RepositorySummary>, BrowseError> {
        self.record(format!("list repositories {}", owner.as_str()));
        Ok(self.repositories.clone())
    }

    async fn list_branches(
        &self,
        _owner: &RepositoryOwner,
        repository: &RepositoryName,
    ) -> Result<Vec<BranchSummary>, BrowseError> {
        self.record(format!("list branches {}", repository.as_str()));
        Ok(self.branches.clone())
    }

    async fn list_commits(
        &self,
        _owner: &RepositoryOwner,
        _repository: &RepositoryName,
        branch: &BranchName,
        page: u32,
    ) -> Result<PagedResult<Commit>, BrowseError> {
        self.record(format!("list commits {} page {page}", branch.as_str()));
        if let Some(error) = &self.commit_failure {
            return Err(error.clone());
        }
        let envelope = PageEnvelope::new(page, self.total_pages.max(1))?;
        Ok(PagedResult::new(
            envelope,
            create_commits(&format!("page{page}"), 2),
        ))
    }
}

#[async_trait]
impl StatusGateway for FakeGateway {
    async fn list_commit_statuses(
        &self,
        _owner: &RepositoryOwner,
        _repository: &RepositoryName,
        commit: &CommitRef,
    ) -> Result<Vec<CommitStatus>, BrowseError> {
        self.record(format!("list commit statuses {}", commit.as_str()));
        Ok(self.statuses.clone())
    }

    async fn combined_status(
        &self,
        _owner: &RepositoryOwner,
        _repository: &RepositoryName,
        commit: &CommitRef,
    ) -> Result<CombinedStatus, BrowseError> {
        self.record(format!("combined status {}", commit.as_str()));
        let state = self
            .statuses
            .first()
            .map_or(StatusState::Pending, |status| status.state);
        Ok(CombinedStatus {
            state,
            sha: commit.as_str().to_owned(),
            total_count: u64::try_from(self.statuses.len()).unwrap_or(u64::MAX),
            statuses: self.statuses.clone(),
        })
    }

    async fn create_commit_status(
        &self,
        _owner: &RepositoryOwner,
        _repository: &RepositoryName,
        status: &NewCommitStatus,
    ) -> Result<CommitStatus, BrowseError> {
        self.record(format!(
            "create commit status {} {}",
            status.sha().as_str(),
            status.state()
        ));
        Ok(CommitStatus {
            id: 99,
            state: status.state(),
            description: status.description().map(str::to_owned),
            target_url: status.target_url().map(str::to_owned),
            context: status.context().map(str::to_owned),
            creator: Some("octocat".to_owned()),
            created_at: None,
        })
    }
}
