//! Repository, branch, and commit page listings.

use std::io::Write;
use std::sync::Arc;

use branchwatch::github::RepositoryOwner;
use branchwatch::telemetry::TelemetrySink;
use branchwatch::{
    BranchwatchConfig, BrowseError, CommitPageLoad, OperationMode, RepositoryBrowser,
    RepositoryGateway,
};

use super::output::{io_error, write_branches, write_commit_page, write_repositories};
use super::resolve_owner;

/// Lists repositories, branches, or a commit page using `gateway`.
///
/// This function is exposed for testing with fake gateways.
///
/// # Errors
///
/// Returns [`BrowseError::Configuration`] when a required field is missing,
/// [`BrowseError::InvalidPage`] when the requested page is out of range,
/// and propagates gateway failures.
pub async fn run_with_gateway<G, W>(
    config: &BranchwatchConfig,
    gateway: G,
    telemetry: Arc<dyn TelemetrySink>,
    writer: &mut W,
) -> Result<(), BrowseError>
where
    G: RepositoryGateway,
    W: Write,
{
    let owner = resolve_owner(config, &gateway).await?;
    let browser = RepositoryBrowser::new(gateway).with_telemetry(telemetry);
    let store = browser.load_repositories(&owner).await?;

    match config.operation_mode() {
        OperationMode::BranchListing => list_branches(config, &browser, writer).await,
        OperationMode::CommitListing => list_commits(config, &owner, &browser, writer).await,
        OperationMode::RepositoryListing
        | OperationMode::StatusReport
        | OperationMode::StatusCreation => {
            write_repositories(writer, owner.as_str(), store.repositories())
        }
    }
}

async fn list_branches<G, W>(
    config: &BranchwatchConfig,
    browser: &RepositoryBrowser<G>,
    writer: &mut W,
) -> Result<(), BrowseError>
where
    G: RepositoryGateway,
    W: Write,
{
    let repo = config.require_repo()?;
    let store = browser.load_branches(repo).await?;
    let repository = store
        .repository(repo)
        .ok_or_else(|| BrowseError::RepositoryNotFound {
            name: repo.to_owned(),
        })?;
    write_branches(writer, repository)
}

/// Loads page 1 to learn the page count, then the requested page.
async fn list_commits<G, W>(
    config: &BranchwatchConfig,
    owner: &RepositoryOwner,
    browser: &RepositoryBrowser<G>,
    writer: &mut W,
) -> Result<(), BrowseError>
where
    G: RepositoryGateway,
    W: Write,
{
    let repo = config.require_repo()?;
    let branch = config.require_branch()?;
    let requested = config.page_num();

    browser.load_branches(repo).await?;
    let first = browser.load_commits(branch, repo, 1).await?;
    let outcome = if requested == 1 {
        first
    } else {
        browser.load_commits(branch, repo, requested).await?
    };

    let CommitPageLoad::Applied(envelope) = outcome else {
        return writeln!(writer, "Page {requested} was superseded by a newer request")
            .map_err(|e| io_error(&e));
    };

    let snapshot = browser.snapshot().await;
    let commits = snapshot
        .branch(repo, branch)
        .and_then(|loaded| loaded.commits())
        .unwrap_or_default();
    let heading = format!("{}/{repo}@{branch}", owner.as_str());
    write_commit_page(writer, &heading, commits, envelope)
}
