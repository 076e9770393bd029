//! Commit status reports and status creation.

use std::io::Write;

use branchwatch::github::RepositoryName;
use branchwatch::telemetry::{TelemetryEvent, TelemetrySink};
use branchwatch::{
    BranchwatchConfig, BrowseError, OperationMode, RepositoryGateway, StatusGateway,
    StatusRequest, StatusService,
};

use super::output::{write_created_status, write_status_board};
use super::resolve_owner;

/// Reports or creates commit statuses using `gateway`.
///
/// This function is exposed for testing with fake gateways.
///
/// # Errors
///
/// Returns [`BrowseError::Configuration`] when the repository or commit is
/// missing, [`BrowseError::InvalidStatusState`] or
/// [`BrowseError::InvalidCommitReference`] for bad input, and propagates
/// gateway failures.
pub async fn run_with_gateway<G, W>(
    config: &BranchwatchConfig,
    gateway: &G,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), BrowseError>
where
    G: RepositoryGateway + StatusGateway,
    W: Write,
{
    let repo = config.require_repo()?;
    let commit = config.require_commit()?;
    let repository = RepositoryName::new(repo)?;
    let owner = resolve_owner(config, gateway).await?;
    let service = StatusService::new(gateway);

    if config.operation_mode() != OperationMode::StatusCreation {
        let board = service
            .statuses_for_commit(&owner, &repository, commit)
            .await?;
        let combined = service.combined_status(&owner, &repository, commit).await?;
        return write_status_board(writer, &combined, &board);
    }

    let request = StatusRequest {
        sha: commit,
        state: config.status_state.as_deref().unwrap_or_default(),
        description: config.description.as_deref(),
        target_url: config.target_url.as_deref(),
        context: config.context.as_deref(),
    };
    let created = service
        .create_commit_status(&owner, &repository, request)
        .await?;
    telemetry.record(TelemetryEvent::CommitStatusCreated {
        repository: repo.to_owned(),
        sha: commit.trim().to_owned(),
        state: created.state.as_str().to_owned(),
    });
    write_created_status(writer, commit.trim(), &created)
}

#[cfg(test)]
mod tests {
    use branchwatch::telemetry::{RecordingTelemetrySink, TelemetryEvent};
    use branchwatch::{BranchwatchConfig, BrowseError};
    use rstest::{fixture, rstest};

    use super::run_with_gateway;
    use crate::cli::test_utils::FakeGateway;

    const SHA: &str = "6dcb09b5b57875f334f61aebed695e2e4193db5e";

    #[fixture]
    fn config() -> BranchwatchConfig {
        BranchwatchConfig {
            token: Some("ghp_example".to_owned()),
            owner: Some("octocat".to_owned()),
            repo: Some("hello".to_owned()),
            commit: Some(SHA.to_owned()),
            ..Default::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn reports_statuses_grouped_by_context(config: BranchwatchConfig) {
        let gateway = FakeGateway::with_repository_tree();
        let sink = RecordingTelemetrySink::default();
        let mut buffer = Vec::new();

        run_with_gateway(&config, &gateway, &sink, &mut buffer)
            .await
            .expect("report should succeed");

        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert!(
            output.contains("Commit 6dcb09b: success (2 statuses)"),
            "got {output}"
        );
        assert!(
            output.contains("  ci/build: success (+1 earlier)"),
            "got {output}"
        );
        assert_eq!(
            gateway.calls(),
            [
                format!("list commit statuses {SHA}"),
                format!("combined status {SHA}"),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn creates_status_and_records_telemetry(mut config: BranchwatchConfig) {
        config.status_state = Some("failure".to_owned());
        config.context = Some("ci/test".to_owned());
        config.description = Some("2 tests failed".to_owned());
        let gateway = FakeGateway::with_repository_tree();
        let sink = RecordingTelemetrySink::default();
        let mut buffer = Vec::new();

        run_with_gateway(&config, &gateway, &sink, &mut buffer)
            .await
            .expect("creation should succeed");

        let output = String::from_utf8(buffer).expect("output should be valid UTF-8");
        assert_eq!(
            output,
            "Created status #99 on 6dcb09b: ci/test is failure - 2 tests failed\n"
        );
        assert_eq!(gateway.calls(), [format!("create commit status {SHA} failure")]);
        assert_eq!(
            sink.take(),
            vec![TelemetryEvent::CommitStatusCreated {
                repository: "hello".to_owned(),
                sha: SHA.to_owned(),
                state: "failure".to_owned(),
            }]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_state_is_rejected_before_any_call(mut config: BranchwatchConfig) {
        config.status_state = Some("green".to_owned());
        let gateway = FakeGateway::with_repository_tree();
        let sink = RecordingTelemetrySink::default();
        let mut buffer = Vec::new();

        let result = run_with_gateway(&config, &gateway, &sink, &mut buffer).await;

        assert_eq!(
            result,
            Err(BrowseError::InvalidStatusState {
                value: "green".to_owned()
            })
        );
        assert!(gateway.calls().is_empty(), "no gateway calls expected");
        assert!(sink.take().is_empty(), "no telemetry expected");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_repository_is_a_configuration_error(mut config: BranchwatchConfig) {
        config.repo = None;
        let gateway = FakeGateway::with_repository_tree();
        let sink = RecordingTelemetrySink::default();
        let mut buffer = Vec::new();

        let result = run_with_gateway(&config, &gateway, &sink, &mut buffer).await;

        assert!(
            matches!(result, Err(BrowseError::Configuration { .. })),
            "expected configuration error, got {result:?}"
        );
    }
}
