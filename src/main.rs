//! Branchwatch CLI entrypoint for browsing repositories and commit statuses.

use std::io::{self, Write};
use std::process::ExitCode;

use branchwatch::{BranchwatchConfig, BrowseError};
use ortho_config::OrthoConfig;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let status = ExitCode::from(cli::exit_status(&error));
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return status;
            }
            status
        }
    }
}

async fn run() -> Result<(), BrowseError> {
    let config = load_config()?;
    config.validate()?;
    branchwatch::logging::init(&config.effective_log_filter())?;
    cli::run(&config).await
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`BrowseError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<BranchwatchConfig, BrowseError> {
    BranchwatchConfig::load().map_err(|error| BrowseError::Configuration {
        message: error.to_string(),
    })
}
