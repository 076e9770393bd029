//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.branchwatch.toml` in current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `BRANCHWATCH_OWNER`, `BRANCHWATCH_TOKEN`,
//!    or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--owner`/`-o`, `--token`/`-t`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! owner = "octocat"
//! repo = "hello-world"
//! branch = "main"
//! api_host = "https://ghe.example.com"
//! log_filter = "branchwatch=debug"
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::BrowseError;
use crate::github::locator::PersonalAccessToken;
use crate::github::session::Session;

/// Filter used when neither `log_filter` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// List the owner's repositories.
    RepositoryListing,
    /// List the branches of one repository.
    BranchListing,
    /// Show one page of a branch's commit history.
    CommitListing,
    /// Show the statuses reported against a commit.
    StatusReport,
    /// Report a new status against a commit.
    StatusCreation,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use branchwatch::BranchwatchConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = BranchwatchConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "BRANCHWATCH",
    discovery(
        dotfile_name = ".branchwatch.toml",
        config_file_name = "branchwatch.toml",
        app_name = "branchwatch"
    )
)]
pub struct BranchwatchConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `BRANCHWATCH_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repository owner (e.g., "octocat").
    ///
    /// Defaults to the login of the authenticated user.
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name (e.g., "hello-world").
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Branch whose commits are listed.
    #[ortho_config(cli_short = 'b')]
    pub branch: Option<String>,

    /// Commit page to show. Page 1 is shown when unset.
    ///
    /// Kept signed so that zero and negative pages reach validation and are
    /// reported as invalid rather than rejected by the argument parser.
    #[ortho_config(cli_short = 'p')]
    pub page: Option<i64>,

    /// Commit SHA or reference whose statuses are shown or created.
    #[ortho_config(cli_short = 'c')]
    pub commit: Option<String>,

    /// State of a status to create: `pending`, `success`, `error`, or
    /// `failure`.
    #[ortho_config(cli_short = 's')]
    pub status_state: Option<String>,

    /// Description of a status to create.
    #[ortho_config()]
    pub description: Option<String>,

    /// Target URL of a status to create.
    #[ortho_config()]
    pub target_url: Option<String>,

    /// Context label of a status to create.
    #[ortho_config()]
    pub context: Option<String>,

    /// GitHub host, such as `https://ghe.example.com`.
    ///
    /// `github.com` is used when unset.
    #[ortho_config()]
    pub api_host: Option<String>,

    /// `tracing` filter directive, overridden by `RUST_LOG`.
    #[ortho_config()]
    pub log_filter: String,

    /// Writes telemetry events to stderr as JSON lines.
    ///
    /// Note: `BRANCHWATCH_TELEMETRY` is not read because `ortho_config` does
    /// not load boolean values from the environment.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for BranchwatchConfig {
    fn default() -> Self {
        Self {
            token: None,
            owner: None,
            repo: None,
            branch: None,
            page: None,
            commit: None,
            status_state: None,
            description: None,
            target_url: None,
            context: None,
            api_host: None,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            telemetry: false,
        }
    }
}

impl BranchwatchConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, BrowseError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(BrowseError::MissingToken)
    }

    /// Builds the session for the configured host and token.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::MissingToken`] when no token is available, or
    /// [`BrowseError::InvalidUrl`] when `api_host` cannot be parsed.
    pub fn session(&self) -> Result<Session, BrowseError> {
        let token = PersonalAccessToken::new(self.resolve_token()?)?;
        match self.api_host.as_deref() {
            Some(host) => Session::for_host(host, Some(token)),
            None => Session::github_com(Some(token)),
        }
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// A commit with a status state creates a status, a commit alone reports
    /// statuses, a repository with a branch lists commits, a repository
    /// alone lists branches, and anything else lists repositories.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        match (
            self.commit.is_some(),
            self.status_state.is_some(),
            self.repo.is_some(),
            self.branch.is_some(),
        ) {
            (true, true, _, _) => OperationMode::StatusCreation,
            (true, false, _, _) => OperationMode::StatusReport,
            (false, _, true, true) => OperationMode::CommitListing,
            (false, _, true, false) => OperationMode::BranchListing,
            (false, _, false, _) => OperationMode::RepositoryListing,
        }
    }

    /// Returns the repository name or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::Configuration`] when no repository is
    /// configured.
    pub fn require_repo(&self) -> Result<&str, BrowseError> {
        self.repo
            .as_deref()
            .ok_or_else(|| missing("repository name is required (use --repo or -r)"))
    }

    /// Returns the branch name or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::Configuration`] when no branch is configured.
    pub fn require_branch(&self) -> Result<&str, BrowseError> {
        self.branch
            .as_deref()
            .ok_or_else(|| missing("branch name is required (use --branch or -b)"))
    }

    /// Returns the commit reference or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::Configuration`] when no commit is configured.
    pub fn require_commit(&self) -> Result<&str, BrowseError> {
        self.commit
            .as_deref()
            .ok_or_else(|| missing("commit reference is required (use --commit or -c)"))
    }

    /// Requested commit page, defaulting to the first.
    #[must_use]
    pub const fn page_num(&self) -> i64 {
        match self.page {
            Some(page) => page,
            None => 1,
        }
    }

    /// Effective log filter: `RUST_LOG` when set, otherwise `log_filter`.
    #[must_use]
    pub fn effective_log_filter(&self) -> String {
        env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.log_filter.clone())
    }

    /// Validates that the configuration is internally consistent.
    ///
    /// Status fields only make sense alongside a commit, and a page only
    /// alongside a branch.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::Configuration`] when a field is set without
    /// the field it depends on.
    pub fn validate(&self) -> Result<(), BrowseError> {
        let has_status_fields = self.status_state.is_some()
            || self.description.is_some()
            || self.target_url.is_some()
            || self.context.is_some();
        if has_status_fields && self.commit.is_none() {
            return Err(missing(
                "status fields need a commit reference (use --commit or -c)",
            ));
        }
        if self.page.is_some() && self.branch.is_none() {
            return Err(missing("--page needs a branch (use --branch or -b)"));
        }
        Ok(())
    }
}

fn missing(message: &str) -> BrowseError {
    BrowseError::Configuration {
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests;
