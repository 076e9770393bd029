//! Fetch orchestration between the GitHub gateway and the local store.
//!
//! [`RepositoryBrowser`] validates requests against the local cache, calls
//! the gateway, and merges successful responses. The state lock is never
//! held across a gateway call, so the cache stays readable while a request
//! is in flight.
//!
//! Every fetch is tagged with a sequence number when it is issued. A
//! response is merged only when no newer request for the same target has
//! been merged already, so once all requests settle the cache holds the
//! most recently issued request that succeeded. A failed request leaves no
//! trace, so an older response still in flight is merged when it arrives.
//! An older response that arrives before a newer one is merged and then
//! replaced.
//!
//! Targets nest: a repository reload supersedes every older branch and
//! commit request, and a branch reload supersedes older commit requests for
//! that repository.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::error::BrowseError;
use super::gateway::RepositoryGateway;
use super::locator::{BranchName, RepositoryName, RepositoryOwner};
use super::pagination::{BranchKey, PageEnvelope, PaginationCursors, is_valid_page_request};
use super::store::{RepoStore, StoreEvent};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};


/// Outcome of a commit page request that reached GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPageLoad {
    /// The page was merged and the branch cursor now holds this envelope.
    Applied(PageEnvelope),
    /// A newer request for the same branch, or a newer reload of its
    /// repository, was merged while this one was in flight; the response was
    /// dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct BrowserState {
    owner: Option<RepositoryOwner>,
    store: RepoStore,
    cursors: PaginationCursors,
    next_sequence: u64,
    repositories_merged: u64,
    branches_merged: HashMap<String, u64>,
    commits_merged: HashMap<BranchKey, u64>,
}

impl BrowserState {
    const fn issue_sequence(&mut self) -> u64 {
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.next_sequence
    }

    fn branches_floor(&self, repository: &str) -> u64 {
        self.branches_merged
            .get(repository)
            .copied()
            .unwrap_or_default()
            .max(self.repositories_merged)
    }

    fn commits_floor(&self, key: &BranchKey) -> u64 {
        self.commits_merged
            .get(key)
            .copied()
            .unwrap_or_default()
            .max(self.branches_floor(key.repository()))
    }

    fn forget_repository(&mut self, repository: &str, sequence: u64) {
        self.cursors.clear_repository(repository);
        self.commits_merged
            .retain(|key, _| key.repository() != repository);
        self.branches_merged.insert(repository.to_owned(), sequence);
    }

    fn forget_all(&mut self, sequence: u64) {
        self.cursors.clear();
        self.commits_merged.clear();
        self.branches_merged.clear();
        self.repositories_merged = sequence;
    }
}

struct CommitRequest {
    owner: RepositoryOwner,
    repository: RepositoryName,
    branch: BranchName,
    key: BranchKey,
    page: u32,
    sequence: u64,
}

/// Keeps the repository tree and per-branch cursors in sync with GitHub.
pub struct RepositoryBrowser<G>
where
    G: RepositoryGateway,
{
    gateway: G,
    telemetry: Arc<dyn TelemetrySink>,
    state: Mutex<BrowserState>,
}

impl<G> RepositoryBrowser<G>
where
    G: RepositoryGateway,
{
    /// Creates a browser with an empty cache.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            telemetry: Arc::new(NoopTelemetrySink),
            state: Mutex::new(BrowserState::default()),
        }
    }

    /// Routes telemetry events to `sink`.
    #[must_use]
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    /// Gateway used for fetches.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Current snapshot of the repository tree.
    pub async fn snapshot(&self) -> RepoStore {
        self.state.lock().await.store.clone()
    }

    /// Last page position recorded for a branch.
    pub async fn cursor(&self, repository: &str, branch: &str) -> Option<PageEnvelope> {
        self.state
            .lock()
            .await
            .cursors
            .get(&BranchKey::new(repository, branch))
    }

    /// Replaces the repository list with `owner`'s repositories.
    ///
    /// Every branch list, commit page, and cursor is discarded. A response
    /// to an older reload arriving after a newer one was merged is dropped
    /// and the current snapshot is returned.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures; the cache is left unchanged.
    pub async fn load_repositories(
        &self,
        owner: &RepositoryOwner,
    ) -> Result<RepoStore, BrowseError> {
        let sequence = self.state.lock().await.issue_sequence();
        let repositories = self.gateway.list_repositories(owner).await?;
        let count = repositories.len();

        let mut state = self.state.lock().await;
        if sequence <= state.repositories_merged {
            tracing::debug!(
                "discarding stale repository list for {owner}",
                owner = owner.as_str()
            );
            return Ok(state.store.clone());
        }
        state.store = state
            .store
            .apply(StoreEvent::ReposLoaded { repositories })?;
        state.forget_all(sequence);
        state.owner = Some(owner.clone());

        self.telemetry.record(TelemetryEvent::RepositoriesLoaded {
            owner: owner.as_str().to_owned(),
            count,
        });
        Ok(state.store.clone())
    }

    /// Replaces the branch list of a loaded repository.
    ///
    /// Commit pages and cursors of that repository's branches are discarded.
    /// Overlapping reloads of one repository resolve like commit pages: a
    /// response older than the merged one is dropped.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::RepositoryNotFound` without a network call when
    /// the repository is not loaded, and propagates gateway failures with
    /// the cache unchanged.
    pub async fn load_branches(&self, repository: &str) -> Result<RepoStore, BrowseError> {
        let (owner, repository_name, sequence) = {
            let mut state = self.state.lock().await;
            let owner = resolve_owner(&state, repository)?;
            let repository_name = RepositoryName::new(repository)?;
            (owner, repository_name, state.issue_sequence())
        };

        let branches = self
            .gateway
            .list_branches(&owner, &repository_name)
            .await?;
        let count = branches.len();

        let mut state = self.state.lock().await;
        if sequence <= state.branches_floor(repository) {
            tracing::debug!("discarding stale branch list for {repository}");
            return Ok(state.store.clone());
        }
        state.store = state.store.apply(StoreEvent::BranchesLoaded {
            repository: repository.to_owned(),
            branches,
        })?;
        state.forget_repository(repository, sequence);

        self.telemetry.record(TelemetryEvent::BranchesLoaded {
            repository: repository.to_owned(),
            count,
        });
        Ok(state.store.clone())
    }

    /// Fetches page `page_num` of a branch's commits and merges it.
    ///
    /// The page is validated against the branch's cursor first: page 1 is
    /// always allowed, any other page needs a known total from an earlier
    /// fetch of the same branch.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::RepositoryNotFound` or
    /// `BrowseError::BranchNotFound` when the target is not loaded, and
    /// `BrowseError::InvalidPage` when the page fails validation. None of
    /// these touch the network. Gateway failures are propagated and leave the
    /// cache and cursor unchanged.
    pub async fn load_commits(
        &self,
        branch: &str,
        repository: &str,
        page_num: i64,
    ) -> Result<CommitPageLoad, BrowseError> {
        let request = self.begin_commit_request(branch, repository, page_num).await?;

        let paged = self
            .gateway
            .list_commits(
                &request.owner,
                &request.repository,
                &request.branch,
                request.page,
            )
            .await?;

        let mut state = self.state.lock().await;
        if request.sequence <= state.commits_floor(&request.key) {
            tracing::debug!(
                "discarding stale commit page {page} for {repository}/{branch}",
                page = request.page
            );
            self.telemetry
                .record(TelemetryEvent::StaleCommitPageDiscarded {
                    repository: repository.to_owned(),
                    branch: branch.to_owned(),
                    page_num: request.page,
                });
            return Ok(CommitPageLoad::Superseded);
        }

        let envelope = paged.envelope();
        let commits = paged.into_page_data();
        let commit_count = commits.len();
        let merged = state.store.apply(StoreEvent::CommitsLoaded {
            repository: repository.to_owned(),
            branch: branch.to_owned(),
            commits,
        })?;
        state.store = merged;
        state
            .commits_merged
            .insert(request.key.clone(), request.sequence);
        state.cursors.record(request.key, envelope);

        self.telemetry.record(TelemetryEvent::CommitPageLoaded {
            repository: repository.to_owned(),
            branch: branch.to_owned(),
            page_num: envelope.page_num(),
            total_num_pages: envelope.total_num_pages(),
            commit_count,
        });
        Ok(CommitPageLoad::Applied(envelope))
    }

    async fn begin_commit_request(
        &self,
        branch: &str,
        repository: &str,
        page_num: i64,
    ) -> Result<CommitRequest, BrowseError> {
        let mut state = self.state.lock().await;
        let owner = resolve_owner(&state, repository)?;
        if state.store.branch(repository, branch).is_none() {
            return Err(BrowseError::BranchNotFound {
                repository: repository.to_owned(),
                branch: branch.to_owned(),
            });
        }

        let key = BranchKey::new(repository, branch);
        let total_num_pages = state.cursors.total_num_pages(&key);
        let invalid_page = || BrowseError::InvalidPage {
            requested: page_num,
            total_num_pages,
        };
        if !is_valid_page_request(page_num, total_num_pages) {
            return Err(invalid_page());
        }
        let page = u32::try_from(page_num).map_err(|_| invalid_page())?;
        let repository_name = RepositoryName::new(repository)?;
        let branch_name = BranchName::new(branch)?;

        let sequence = state.issue_sequence();
        Ok(CommitRequest {
            owner,
            repository: repository_name,
            branch: branch_name,
            key,
            page,
            sequence,
        })
    }
}

fn resolve_owner(state: &BrowserState, repository: &str) -> Result<RepositoryOwner, BrowseError> {
    let not_found = || BrowseError::RepositoryNotFound {
        name: repository.to_owned(),
    };
    state.store.repository(repository).ok_or_else(not_found)?;
    state.owner.clone().ok_or_else(not_found)
}
