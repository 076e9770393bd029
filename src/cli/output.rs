//! Output formatting utilities for CLI operations.

use std::io::{self, Write};
use std::sync::Arc;

use branchwatch::github::locator::short_sha;
use branchwatch::github::models::{CombinedStatus, Commit, CommitStatus};
use branchwatch::github::{Branch, Repository};
use branchwatch::{BrowseError, PageEnvelope, PageRange, StatusBoard};

/// Pages shown either side of the current page in the page strip.
const STRIP_RADIUS: u32 = 2;

/// Writes the repositories of `owner`, one per line.
pub fn write_repositories<W: Write>(
    writer: &mut W,
    owner: &str,
    repositories: &[Arc<Repository>],
) -> Result<(), BrowseError> {
    writeln!(writer, "Repositories for {owner}:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for repository in repositories {
        let summary = repository.summary();
        let visibility = if summary.private { " [private]" } else { "" };
        let description = summary.description.as_deref().unwrap_or("(no description)");
        writeln!(writer, "  {}{visibility} - {description}", summary.name)
            .map_err(|e| io_error(&e))?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{} repositories", repositories.len()).map_err(|e| io_error(&e))
}

/// Writes the branches of `repository`, marking the default branch.
pub fn write_branches<W: Write>(
    writer: &mut W,
    repository: &Repository,
) -> Result<(), BrowseError> {
    let branches: &[Arc<Branch>] = repository.branches().unwrap_or_default();
    let default_branch = repository.summary().default_branch.as_deref();

    writeln!(writer, "Branches of {}:", repository.name()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for branch in branches {
        let marker = if Some(branch.name()) == default_branch {
            "*"
        } else {
            " "
        };
        let head = branch.summary().head_sha.as_deref().map_or("", short_sha);
        let protection = if branch.summary().protected {
            " (protected)"
        } else {
            ""
        };
        writeln!(writer, "{marker} {} {head}{protection}", branch.name())
            .map_err(|e| io_error(&e))?;
    }

    Ok(())
}

/// Writes one page of commits followed by the page position and strip.
pub fn write_commit_page<W: Write>(
    writer: &mut W,
    heading: &str,
    commits: &[Commit],
    envelope: PageEnvelope,
) -> Result<(), BrowseError> {
    writeln!(writer, "Commits on {heading}:").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for commit in commits {
        let author = commit
            .author_login
            .as_deref()
            .or(commit.author_name.as_deref())
            .unwrap_or("unknown");
        let date = commit
            .authored_at
            .map(|at| at.format(" %Y-%m-%d").to_string())
            .unwrap_or_default();
        writeln!(
            writer,
            "  {} {} (@{author}{date})",
            short_sha(&commit.sha),
            commit.summary()
        )
        .map_err(|e| io_error(&e))?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "Page {} of {}",
        envelope.page_num(),
        envelope.total_num_pages()
    )
    .map_err(|e| io_error(&e))?;

    let strip = page_strip(envelope)?;
    writeln!(writer, "Pages: {strip}").map_err(|e| io_error(&e))
}

/// Renders the pages around the current one, bracketing the current page.
///
/// # Errors
///
/// Returns [`BrowseError::InvalidPageRange`] only if the envelope bounds are
/// inconsistent, which [`PageEnvelope`] construction rules out.
pub fn page_strip(envelope: PageEnvelope) -> Result<String, BrowseError> {
    let current = envelope.page_num();
    let total = envelope.total_num_pages();
    let start = current.saturating_sub(STRIP_RADIUS).max(1);
    let end = current.saturating_add(STRIP_RADIUS).min(total);
    let range = PageRange::new(start, end)?;

    let mut parts: Vec<String> = Vec::new();
    if range.start() > 1 {
        parts.push("...".to_owned());
    }
    parts.extend(range.iter().map(|page| {
        if page == current {
            format!("[{page}]")
        } else {
            page.to_string()
        }
    }));
    if range.end() < total {
        parts.push("...".to_owned());
    }
    Ok(parts.join(" "))
}

/// Writes the combined state and the per-context statuses of a commit.
pub fn write_status_board<W: Write>(
    writer: &mut W,
    combined: &CombinedStatus,
    board: &StatusBoard,
) -> Result<(), BrowseError> {
    writeln!(
        writer,
        "Commit {}: {} ({} statuses)",
        short_sha(&combined.sha),
        combined.state,
        combined.total_count
    )
    .map_err(|e| io_error(&e))?;

    for group in board.contexts() {
        let Some(latest) = group.latest() else {
            continue;
        };
        let history = group.statuses.len().saturating_sub(1);
        writeln!(
            writer,
            "  {}: {}{} (+{history} earlier)",
            group.context,
            latest.state,
            description_suffix(latest)
        )
        .map_err(|e| io_error(&e))?;
    }

    Ok(())
}

/// Writes a confirmation line for a created status.
pub fn write_created_status<W: Write>(
    writer: &mut W,
    commit: &str,
    status: &CommitStatus,
) -> Result<(), BrowseError> {
    let context = status.context.as_deref().unwrap_or("default");
    writeln!(
        writer,
        "Created status #{} on {}: {context} is {}{}",
        status.id,
        short_sha(commit),
        status.state,
        description_suffix(status)
    )
    .map_err(|e| io_error(&e))
}

fn description_suffix(status: &CommitStatus) -> String {
    status
        .description
        .as_deref()
        .map(|description| format!(" - {description}"))
        .unwrap_or_default()
}

/// Converts an I/O error to a [`BrowseError::Io`].
pub(crate) fn io_error(error: &io::Error) -> BrowseError {
    BrowseError::Io {
        message: error.to_string(),
    }
}
