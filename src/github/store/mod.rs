//! Normalised local cache of repositories, their branches, and one page of
//! commits per branch.
//!
//! [`RepoStore`] is an immutable snapshot. Every update returns a new
//! snapshot that shares unchanged nodes with its predecessor through `Arc`,
//! so readers holding an old snapshot never observe a partial merge.

use std::collections::HashSet;
use std::sync::Arc;

use super::error::BrowseError;
use super::models::{BranchSummary, Commit, RepositorySummary};


/// A branch and the commits of the page last loaded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    summary: BranchSummary,
    commits: Option<Vec<Commit>>,
}

impl Branch {
    const fn unloaded(summary: BranchSummary) -> Self {
        Self {
            summary,
            commits: None,
        }
    }

    /// Branch name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    /// Metadata as returned by GitHub.
    #[must_use]
    pub const fn summary(&self) -> &BranchSummary {
        &self.summary
    }

    /// Commits of the last loaded page, or `None` before the first fetch.
    #[must_use]
    pub fn commits(&self) -> Option<&[Commit]> {
        self.commits.as_deref()
    }
}

/// A repository and, once fetched, its branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    summary: RepositorySummary,
    branches: Option<Vec<Arc<Branch>>>,
}

impl Repository {
    const fn unloaded(summary: RepositorySummary) -> Self {
        Self {
            summary,
            branches: None,
        }
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    /// Metadata as returned by GitHub.
    #[must_use]
    pub const fn summary(&self) -> &RepositorySummary {
        &self.summary
    }

    /// Branches, or `None` before they have been fetched.
    #[must_use]
    pub fn branches(&self) -> Option<&[Arc<Branch>]> {
        self.branches.as_deref()
    }

    /// First branch called `name`.
    #[must_use]
    pub fn branch(&self, name: &str) -> Option<&Arc<Branch>> {
        self.branches()?.iter().find(|branch| branch.name() == name)
    }
}

/// A merge to apply to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The repository list for an owner arrived.
    ReposLoaded {
        /// Every repository, replacing the previous list.
        repositories: Vec<RepositorySummary>,
    },
    /// The branch list for a repository arrived.
    BranchesLoaded {
        /// Repository the branches belong to.
        repository: String,
        /// Every branch, replacing the previous list.
        branches: Vec<BranchSummary>,
    },
    /// A page of commits for a branch arrived.
    CommitsLoaded {
        /// Repository owning the branch.
        repository: String,
        /// Branch the commits were listed from.
        branch: String,
        /// Commits of the fetched page.
        commits: Vec<Commit>,
    },
}

/// Immutable snapshot of the repository tree.
///
/// # Example
///
/// ```
/// use branchwatch::github::models::{BranchSummary, RepositorySummary};
/// use branchwatch::github::store::RepoStore;
///
/// let repo = RepositorySummary { name: "repoA".to_owned(), ..Default::default() };
/// let branch = BranchSummary { name: "main".to_owned(), ..Default::default() };
///
/// let store = RepoStore::new()
///     .with_repos_loaded(vec![repo])
///     .with_branches_loaded(vec![branch], "repoA")
///     .expect("repoA is loaded");
///
/// let main = store.branch("repoA", "main").expect("main is loaded");
/// assert!(main.commits().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStore {
    repositories: Option<Arc<[Arc<Repository>]>>,
}

impl RepoStore {
    /// Creates a store with nothing loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once a repository list has been merged.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.repositories.is_some()
    }

    /// Loaded repositories in the order GitHub returned them.
    #[must_use]
    pub fn repositories(&self) -> &[Arc<Repository>] {
        self.repositories.as_deref().unwrap_or_default()
    }

    /// First repository called `name`.
    #[must_use]
    pub fn repository(&self, name: &str) -> Option<&Arc<Repository>> {
        self.repositories().iter().find(|repo| repo.name() == name)
    }

    /// First branch called `branch` in the first repository called
    /// `repository`.
    #[must_use]
    pub fn branch(&self, repository: &str, branch: &str) -> Option<&Arc<Branch>> {
        self.repository(repository)?.branch(branch)
    }

    /// Replaces every repository. Branches of the new repositories are
    /// unloaded.
    #[must_use]
    pub fn with_repos_loaded(&self, repositories: Vec<RepositorySummary>) -> Self {
        warn_on_duplicates("repository", repositories.iter().map(|repo| repo.name.as_str()));

        let nodes: Vec<Arc<Repository>> = repositories
            .into_iter()
            .map(|summary| Arc::new(Repository::unloaded(summary)))
            .collect();
        Self {
            repositories: Some(nodes.into()),
        }
    }

    /// Replaces the branch list of `repository`. Commits of the new branches
    /// are unloaded.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::RepositoryNotFound` when `repository` is not
    /// loaded.
    pub fn with_branches_loaded(
        &self,
        branches: Vec<BranchSummary>,
        repository: &str,
    ) -> Result<Self, BrowseError> {
        let (index, current) = self.locate_repository(repository)?;
        warn_on_duplicates("branch", branches.iter().map(|branch| branch.name.as_str()));

        let replacement = Repository {
            summary: current.summary.clone(),
            branches: Some(
                branches
                    .into_iter()
                    .map(|summary| Arc::new(Branch::unloaded(summary)))
                    .collect(),
            ),
        };
        Ok(self.with_repository_at(index, replacement))
    }

    /// Replaces the commits of `branch` in `repository`.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::RepositoryNotFound` or
    /// `BrowseError::BranchNotFound` when either is not loaded.
    pub fn with_commits_loaded(
        &self,
        commits: Vec<Commit>,
        branch: &str,
        repository: &str,
    ) -> Result<Self, BrowseError> {
        let (repo_index, current_repo) = self.locate_repository(repository)?;
        let siblings = current_repo.branches().unwrap_or_default();
        let (branch_index, current_branch) = siblings
            .iter()
            .enumerate()
            .find(|(_, candidate)| candidate.name() == branch)
            .ok_or_else(|| BrowseError::BranchNotFound {
                repository: repository.to_owned(),
                branch: branch.to_owned(),
            })?;

        let updated_branch = Arc::new(Branch {
            summary: current_branch.summary.clone(),
            commits: Some(commits),
        });
        let replacement = Repository {
            summary: current_repo.summary.clone(),
            branches: Some(replace_at(siblings, branch_index, &updated_branch)),
        };
        Ok(self.with_repository_at(repo_index, replacement))
    }

    /// Applies `event`, returning the merged snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the lookup errors of the underlying merge.
    pub fn apply(&self, event: StoreEvent) -> Result<Self, BrowseError> {
        match event {
            StoreEvent::ReposLoaded { repositories } => Ok(self.with_repos_loaded(repositories)),
            StoreEvent::BranchesLoaded {
                repository,
                branches,
            } => self.with_branches_loaded(branches, &repository),
            StoreEvent::CommitsLoaded {
                repository,
                branch,
                commits,
            } => self.with_commits_loaded(commits, &branch, &repository),
        }
    }

    fn locate_repository(&self, name: &str) -> Result<(usize, &Arc<Repository>), BrowseError> {
        self.repositories()
            .iter()
            .enumerate()
            .find(|(_, repo)| repo.name() == name)
            .ok_or_else(|| BrowseError::RepositoryNotFound {
                name: name.to_owned(),
            })
    }

    fn with_repository_at(&self, index: usize, replacement: Repository) -> Self {
        let nodes = replace_at(self.repositories(), index, &Arc::new(replacement));
        Self {
            repositories: Some(nodes.into()),
        }
    }
}

fn replace_at<T>(nodes: &[Arc<T>], index: usize, replacement: &Arc<T>) -> Vec<Arc<T>> {
    nodes
        .iter()
        .enumerate()
        .map(|(position, node)| {
            if position == index {
                Arc::clone(replacement)
            } else {
                Arc::clone(node)
            }
        })
        .collect()
}

fn warn_on_duplicates<'a>(kind: &str, names: impl Iterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            tracing::warn!("duplicate {kind} name `{name}`; lookups use the first entry");
        }
    }
}
