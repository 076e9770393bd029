//! Structured telemetry events and sinks.
//!
//! Events describe what the browser merged into its local cache and which
//! responses it discarded. They are opt-in and only ever written locally.

use std::io;
#[cfg(any(test, feature = "test-support"))]
use std::sync::PoisonError;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by branchwatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A repository list replaced the cached one.
    RepositoriesLoaded {
        /// Owner whose repositories were listed.
        owner: String,
        /// Number of repositories merged.
        count: usize,
    },
    /// A branch list replaced the cached one for a repository.
    BranchesLoaded {
        /// Repository the branches belong to.
        repository: String,
        /// Number of branches merged.
        count: usize,
    },
    /// A page of commits was merged and the branch cursor advanced.
    CommitPageLoaded {
        /// Repository owning the branch.
        repository: String,
        /// Branch the commits were listed from.
        branch: String,
        /// Page that was merged.
        page_num: u32,
        /// Total pages reported alongside it.
        total_num_pages: u32,
        /// Number of commits on the page.
        commit_count: usize,
    },
    /// A commit page arrived after a newer request for the same branch and
    /// was dropped.
    StaleCommitPageDiscarded {
        /// Repository owning the branch.
        repository: String,
        /// Branch the commits were listed from.
        branch: String,
        /// Page carried by the stale response.
        page_num: u32,
    },
    /// A commit status was created.
    CommitStatusCreated {
        /// Repository the commit belongs to.
        repository: String,
        /// Commit SHA.
        sha: String,
        /// Reported state.
        state: String,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Sink that keeps events in memory for assertions.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: std::sync::Mutex<Vec<TelemetryEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingTelemetrySink {
    /// Drains and returns every recorded event.
    #[must_use]
    pub fn take(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl TelemetrySink for RecordingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
