//! Test helpers for constructing repository, branch, commit, and status
//! fixtures.
//!
//! # Examples
//!
//! ```
//! use branchwatch::github::models::test_support::{branch_named, commit_with_sha};
//!
//! let branch = branch_named("main");
//! assert_eq!(branch.name, "main");
//!
//! let commit = commit_with_sha("abc123");
//! assert_eq!(commit.message.as_deref(), Some("Commit abc123"));
//! ```

use super::{BranchSummary, Commit, CommitStatus, RepositorySummary, StatusState};

/// Constructs a repository summary with the given name owned by `octocat`.
#[must_use]
pub fn repository_named(name: &str) -> RepositorySummary {
    RepositorySummary {
        id: 1,
        name: name.to_owned(),
        owner: Some("octocat".to_owned()),
        full_name: Some(format!("octocat/{name}")),
        default_branch: Some("main".to_owned()),
        ..Default::default()
    }
}

/// Constructs a branch summary with only a name.
#[must_use]
pub fn branch_named(name: &str) -> BranchSummary {
    BranchSummary {
        name: name.to_owned(),
        ..Default::default()
    }
}

/// Constructs a commit with the given SHA and a message derived from it.
#[must_use]
pub fn commit_with_sha(sha: &str) -> Commit {
    Commit {
        sha: sha.to_owned(),
        message: Some(format!("Commit {sha}")),
        author_name: Some("Monalisa Octocat".to_owned()),
        ..Default::default()
    }
}

/// Creates commits `{prefix}-1` through `{prefix}-{count}`.
///
/// ```
/// use branchwatch::github::models::test_support::create_commits;
///
/// let commits = create_commits("p2", 2);
/// let shas: Vec<&str> = commits.iter().map(|commit| commit.sha.as_str()).collect();
/// assert_eq!(shas, ["p2-1", "p2-2"]);
/// ```
#[must_use]
pub fn create_commits(prefix: &str, count: usize) -> Vec<Commit> {
    (1..=count)
        .map(|index| commit_with_sha(&format!("{prefix}-{index}")))
        .collect()
}

/// Constructs a status reported by `context`.
#[must_use]
pub fn status_for_context(id: u64, context: &str, state: StatusState) -> CommitStatus {
    CommitStatus {
        id,
        state,
        description: None,
        target_url: None,
        context: Some(context.to_owned()),
        creator: Some("ci-bot".to_owned()),
        created_at: None,
    }
}
