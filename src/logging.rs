//! Diagnostic logging setup for the `branchwatch` binary.
//!
//! Library code only emits `tracing` events. The binary installs a
//! formatting subscriber that writes them to stderr, filtered by an
//! `EnvFilter` built from the configured directive.

use std::io;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::github::error::BrowseError;

/// Parses `directive` into a filter.
///
/// # Errors
///
/// Returns [`BrowseError::Configuration`] when the directive is not a valid
/// `EnvFilter` expression.
pub fn build_filter(directive: &str) -> Result<EnvFilter, BrowseError> {
    EnvFilter::try_new(directive).map_err(|error| BrowseError::Configuration {
        message: format!("invalid log filter `{directive}`: {error}"),
    })
}

/// Builds a subscriber that formats events into `writer`.
///
/// # Errors
///
/// Returns [`BrowseError::Configuration`] when `directive` is invalid.
pub fn subscriber<W>(
    directive: &str,
    writer: W,
) -> Result<impl Subscriber + Send + Sync + use<W>, BrowseError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_filter(directive)?;
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .without_time();
    Ok(Registry::default().with(filter).with(layer))
}

/// Installs the global subscriber, writing to stderr.
///
/// # Errors
///
/// Returns [`BrowseError::Configuration`] when `directive` is invalid or a
/// global subscriber is already installed.
pub fn init(directive: &str) -> Result<(), BrowseError> {
    subscriber(directive, io::stderr)?
        .try_init()
        .map_err(|error| BrowseError::Configuration {
            message: format!("failed to install log subscriber: {error}"),
        })
}
