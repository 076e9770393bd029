//! CLI operation mode handlers.
//!
//! - [`browse`]: Repository, branch, and commit page listings
//! - [`statuses`]: Commit status reports and status creation
//!
//! Output formatting utilities are in [`output`].

use std::io;
use std::sync::Arc;

use branchwatch::github::RepositoryOwner;
use branchwatch::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use branchwatch::{
    BranchwatchConfig, BrowseError, OctocrabGateway, OperationMode, RepositoryGateway,
};

pub mod browse;
pub mod output;
pub mod statuses;

#[cfg(test)]
pub mod test_utils;

/// Runs the operation selected by `config` against GitHub.
///
/// # Errors
///
/// Returns [`BrowseError::MissingToken`] when no token is configured and
/// propagates failures from the selected operation.
pub async fn run(config: &BranchwatchConfig) -> Result<(), BrowseError> {
    let session = config.session()?;
    let gateway = OctocrabGateway::for_session(&session)?;
    let telemetry = telemetry_sink(config);
    let mut stdout = io::stdout().lock();

    match config.operation_mode() {
        OperationMode::StatusReport | OperationMode::StatusCreation => {
            statuses::run_with_gateway(config, &gateway, telemetry.as_ref(), &mut stdout).await
        }
        OperationMode::RepositoryListing
        | OperationMode::BranchListing
        | OperationMode::CommitListing => {
            browse::run_with_gateway(config, gateway, telemetry, &mut stdout).await
        }
    }
}

/// Selects the telemetry sink requested by `config`.
#[must_use]
pub fn telemetry_sink(config: &BranchwatchConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}

/// Exit status for usage errors: bad arguments, configuration, or input
/// rejected before any GitHub call.
pub const USAGE_EXIT_STATUS: u8 = 2;

/// Exit status for failures after input was accepted.
pub const FAILURE_EXIT_STATUS: u8 = 1;

/// Maps an error to the process exit status.
#[must_use]
pub const fn exit_status(error: &BrowseError) -> u8 {
    if error.is_validation()
        || matches!(
            error,
            BrowseError::Configuration { .. } | BrowseError::InvalidPage { .. }
        )
    {
        USAGE_EXIT_STATUS
    } else {
        FAILURE_EXIT_STATUS
    }
}

/// Returns the configured owner, or the login of the token's user.
///
/// # Errors
///
/// Returns [`BrowseError::EmptyIdentifier`] for a blank owner and propagates
/// failures fetching the authenticated user.
pub async fn resolve_owner<G: RepositoryGateway>(
    config: &BranchwatchConfig,
    gateway: &G,
) -> Result<RepositoryOwner, BrowseError> {
    if let Some(owner) = config.owner.as_deref() {
        return RepositoryOwner::new(owner);
    }

    let user = gateway.authenticated_user().await?;
    tracing::debug!("no owner configured; using authenticated user {}", user.login);
    RepositoryOwner::new(&user.login)
}
