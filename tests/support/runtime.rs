//! Shared Tokio runtime and Wiremock helpers for behavioural tests.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }

    /// Runs `build` inside the runtime context, for clients that spawn
    /// background tasks on construction.
    pub fn enter<R>(&self, build: impl FnOnce() -> R) -> R {
        let runtime = self.0.borrow();
        let _guard = runtime.enter();
        build()
    }
}

/// Ensures a Tokio runtime and Wiremock server are initialised.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created or if the slots
/// behave unexpectedly.
pub fn ensure_runtime_and_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime::new(Runtime::new()?));
    }

    let shared_runtime = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime not initialised after set"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

/// Mounts `mock` on the scenario's server.
///
/// # Panics
///
/// Panics if the runtime or server has not been initialised.
pub fn mount(runtime: &Slot<SharedRuntime>, server: &Slot<MockServer>, mock: Mock) {
    let shared_runtime = runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    server
        .with_ref(|mock_server| shared_runtime.block_on(mock.mount(mock_server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// Number of requests the scenario's server has received for `path`.
///
/// # Panics
///
/// Panics if the runtime has not been initialised.
pub fn received_request_count(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
    path: &str,
) -> usize {
    let shared_runtime = runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    server
        .with_ref(|mock_server| shared_runtime.block_on(mock_server.received_requests()))
        .flatten()
        .map_or(0, |requests| {
            requests
                .iter()
                .filter(|request| request.url.path() == path)
                .count()
        })
}
