//! Behavioural tests for per-branch commit pagination against a mock GitHub
//! API.

#[path = "support/runtime.rs"]
mod runtime;

use std::rc::Rc;

use branchwatch::github::RepositoryOwner;
use branchwatch::{
    BrowseError, CommitPageLoad, OctocrabGateway, PersonalAccessToken, RemoteFailure,
    RepositoryBrowser, Session,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use runtime::{SharedRuntime, ensure_runtime_and_server, mount, received_request_count};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMMITS_PER_PAGE: u32 = 2;

#[derive(ScenarioState, Default)]
struct PaginationState {
    runtime: Slot<SharedRuntime>,
    server: Slot<MockServer>,
    owner: Slot<String>,
    repository: Slot<String>,
    browser: Slot<Rc<RepositoryBrowser<OctocrabGateway>>>,
    outcome: Slot<CommitPageLoad>,
    error: Slot<BrowseError>,
}

#[fixture]
fn pagination_state() -> PaginationState {
    PaginationState::default()
}

impl PaginationState {
    fn shared_runtime(&self) -> SharedRuntime {
        self.runtime
            .get()
            .unwrap_or_else(|| panic!("runtime not initialised"))
    }

    fn server_uri(&self) -> String {
        self.server
            .with_ref(MockServer::uri)
            .unwrap_or_else(|| panic!("mock server not initialised"))
    }

    fn commits_path(&self) -> String {
        let owner = self.owner.get().unwrap_or_else(|| panic!("owner missing"));
        let repository = self
            .repository
            .get()
            .unwrap_or_else(|| panic!("repository missing"));
        format!("/api/v3/repos/{owner}/{repository}/commits")
    }

    fn browser(&self) -> Rc<RepositoryBrowser<OctocrabGateway>> {
        self.browser
            .get()
            .unwrap_or_else(|| panic!("repository tree not loaded"))
    }
}

fn commit_json(sha: &str) -> Value {
    json!({
        "sha": sha,
        "commit": {
            "message": format!("Commit {sha}"),
            "author": { "name": "Mona", "date": "2024-05-01T10:00:00Z" }
        },
        "author": { "login": "octocat" }
    })
}

fn commits_for_page(page: u32) -> Vec<Value> {
    (1..=COMMITS_PER_PAGE)
        .map(|index| commit_json(&format!("p{page}-{index}")))
        .collect()
}

/// Builds a `Link` header the way GitHub does: `last` is omitted on the
/// final page.
fn link_header(url: &str, branch: &str, page: u32, total: u32) -> Option<String> {
    let mut links = Vec::new();
    if page < total {
        links.push(format!(
            "<{url}?sha={branch}&page={}>; rel=\"next\"",
            page + 1
        ));
        links.push(format!("<{url}?sha={branch}&page={total}>; rel=\"last\""));
    }
    if page > 1 {
        links.push(format!("<{url}?sha={branch}&page=1>; rel=\"first\""));
        links.push(format!(
            "<{url}?sha={branch}&page={}>; rel=\"prev\"",
            page - 1
        ));
    }
    (!links.is_empty()).then(|| links.join(", "))
}

fn remember_outcome(state: &PaginationState, result: Result<CommitPageLoad, BrowseError>) {
    match result {
        Ok(outcome) => {
            let _had_previous_error = state.error.take().is_some();
            state.outcome.set(outcome);
        }
        Err(error) => {
            let _had_previous_outcome = state.outcome.take().is_some();
            state.error.set(error);
        }
    }
}

// --- Given steps ---

#[given("a GitHub server listing repository {repository} with branch {branch} for {owner}")]
fn seed_repository_tree(
    pagination_state: &PaginationState,
    repository: String,
    branch: String,
    owner: String,
) {
    ensure_runtime_and_server(&pagination_state.runtime, &pagination_state.server)
        .unwrap_or_else(|error| panic!("failed to start mock server: {error}"));

    let repositories = Mock::given(method("GET"))
        .and(path(format!("/api/v3/users/{owner}/repos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "name": repository,
            "owner": { "login": owner },
            "default_branch": branch
        }])));
    let branches = Mock::given(method("GET"))
        .and(path(format!("/api/v3/repos/{owner}/{repository}/branches")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": branch,
            "commit": { "sha": "p1-1" },
            "protected": false
        }])));
    mount(&pagination_state.runtime, &pagination_state.server, repositories);
    mount(&pagination_state.runtime, &pagination_state.server, branches);

    pagination_state.owner.set(owner);
    pagination_state.repository.set(repository);
}

#[given("branch {branch} has {pages:u32} commit pages")]
fn seed_commit_pages(pagination_state: &PaginationState, branch: String, pages: u32) {
    let commits_path = pagination_state.commits_path();
    let commits_url = format!("{}{commits_path}", pagination_state.server_uri());

    for page in 1..=pages {
        let mut response = ResponseTemplate::new(200).set_body_json(commits_for_page(page));
        if let Some(link) = link_header(&commits_url, &branch, page, pages) {
            response = response.insert_header("Link", link);
        }
        let mock = Mock::given(method("GET"))
            .and(path(commits_path.as_str()))
            .and(query_param("sha", branch.as_str()))
            .and(query_param("page", page.to_string()))
            .respond_with(response);
        mount(&pagination_state.runtime, &pagination_state.server, mock);
    }
}

#[given("branch {branch} serves one commit page without a Link header")]
fn seed_single_page(pagination_state: &PaginationState, branch: String) {
    let mock = Mock::given(method("GET"))
        .and(path(pagination_state.commits_path()))
        .and(query_param("sha", branch.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(commits_for_page(1)));
    mount(&pagination_state.runtime, &pagination_state.server, mock);
}

#[given("the repository tree is loaded")]
fn load_repository_tree(pagination_state: &PaginationState) {
    let shared_runtime = pagination_state.shared_runtime();
    let token = PersonalAccessToken::new("valid-token")
        .unwrap_or_else(|error| panic!("token should be valid: {error}"));
    let session = Session::for_host(&pagination_state.server_uri(), Some(token))
        .unwrap_or_else(|error| panic!("session should build: {error}"));
    let gateway = shared_runtime
        .enter(|| OctocrabGateway::for_session(&session))
        .unwrap_or_else(|error| panic!("gateway should build: {error}"));
    let browser = Rc::new(RepositoryBrowser::new(gateway));

    let owner_login = pagination_state
        .owner
        .get()
        .unwrap_or_else(|| panic!("owner missing"));
    let owner = RepositoryOwner::new(&owner_login)
        .unwrap_or_else(|error| panic!("owner should be valid: {error}"));
    let repository = pagination_state
        .repository
        .get()
        .unwrap_or_else(|| panic!("repository missing"));

    shared_runtime
        .block_on(async {
            browser.load_repositories(&owner).await?;
            browser.load_branches(&repository).await
        })
        .unwrap_or_else(|error| panic!("repository tree should load: {error}"));

    pagination_state.browser.set(browser);
}

// --- When steps ---

#[when("page {page:i64} of {branch} is requested")]
fn request_page(pagination_state: &PaginationState, page: i64, branch: String) {
    let browser = pagination_state.browser();
    let repository = pagination_state
        .repository
        .get()
        .unwrap_or_else(|| panic!("repository missing"));

    let result = pagination_state
        .shared_runtime()
        .block_on(browser.load_commits(&branch, &repository, page));
    remember_outcome(pagination_state, result);
}

#[when("GitHub starts rate limiting commit listings")]
fn start_rate_limiting(pagination_state: &PaginationState) {
    let mock = Mock::given(method("GET"))
        .and(path(pagination_state.commits_path()))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for user",
            "documentation_url": "https://docs.github.com/rest/rate-limit"
        })))
        .with_priority(1);
    mount(&pagination_state.runtime, &pagination_state.server, mock);
}

// --- Then steps ---

#[then("the request fails because page {page:i64} is invalid")]
fn assert_invalid_page(pagination_state: &PaginationState, page: i64) {
    let error = pagination_state
        .error
        .get()
        .unwrap_or_else(|| panic!("expected an invalid page error"));

    assert!(
        matches!(error, BrowseError::InvalidPage { requested, .. } if requested == page),
        "expected InvalidPage for page {page}, got {error:?}"
    );
}

#[then("the request fails because GitHub is rate limiting")]
fn assert_rate_limited(pagination_state: &PaginationState) {
    let error = pagination_state
        .error
        .get()
        .unwrap_or_else(|| panic!("expected a rate limit error"));

    assert_eq!(
        error,
        BrowseError::Remote {
            operation: "list commits".to_owned(),
            kind: RemoteFailure::RateLimited,
        }
    );
}

#[then("no commit page was fetched")]
fn assert_no_commit_fetch(pagination_state: &PaginationState) {
    let fetched = received_request_count(
        &pagination_state.runtime,
        &pagination_state.server,
        &pagination_state.commits_path(),
    );

    assert_eq!(fetched, 0, "commit pages must not be fetched");
}

#[then("the cursor for {branch} is page {page:u32} of {total:u32}")]
fn assert_cursor(pagination_state: &PaginationState, branch: String, page: u32, total: u32) {
    let browser = pagination_state.browser();
    let repository = pagination_state
        .repository
        .get()
        .unwrap_or_else(|| panic!("repository missing"));

    let cursor = pagination_state
        .shared_runtime()
        .block_on(browser.cursor(&repository, &branch))
        .unwrap_or_else(|| panic!("cursor for {branch} missing"));

    assert_eq!(
        (cursor.page_num(), cursor.total_num_pages()),
        (page, total),
        "cursor mismatch"
    );
}

#[then("the cached commits of {branch} come from page {page:u32}")]
fn assert_cached_commits(pagination_state: &PaginationState, branch: String, page: u32) {
    let browser = pagination_state.browser();
    let repository = pagination_state
        .repository
        .get()
        .unwrap_or_else(|| panic!("repository missing"));

    let snapshot = pagination_state.shared_runtime().block_on(browser.snapshot());
    let shas: Vec<String> = snapshot
        .branch(&repository, &branch)
        .and_then(|loaded| loaded.commits())
        .unwrap_or_default()
        .iter()
        .map(|commit| commit.sha.clone())
        .collect();

    let expected: Vec<String> = (1..=COMMITS_PER_PAGE)
        .map(|index| format!("p{page}-{index}"))
        .collect();
    assert_eq!(shas, expected, "cached commits mismatch");
}

// --- Scenario bindings ---

#[scenario(path = "tests/features/commit_pagination.feature", index = 0)]
fn paging_beyond_unknown_total(pagination_state: PaginationState) {
    let _ = pagination_state;
}

#[scenario(path = "tests/features/commit_pagination.feature", index = 1)]
fn first_page_reveals_total(pagination_state: PaginationState) {
    let _ = pagination_state;
}

#[scenario(path = "tests/features/commit_pagination.feature", index = 2)]
fn page_past_total_is_rejected(pagination_state: PaginationState) {
    let _ = pagination_state;
}

#[scenario(path = "tests/features/commit_pagination.feature", index = 3)]
fn branch_without_link_header(pagination_state: PaginationState) {
    let _ = pagination_state;
}

#[scenario(path = "tests/features/commit_pagination.feature", index = 4)]
fn rate_limiting_keeps_cache(pagination_state: PaginationState) {
    let _ = pagination_state;
}
