//! Shared helpers for the `hypher` integration tests: tracing setup,
//! graph/definition builders and instrumented ops.

pub mod builders;
pub mod ops;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for a single awaited run in tests.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-captured subscriber once per test binary.
///
/// Output shows up only for failing tests unless run with `--nocapture`.
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=hypher=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, panicking after [`TEST_TIMEOUT`]. A hung graph run is a failure.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    with_timeout_of(TEST_TIMEOUT, f).await
}

pub async fn with_timeout_of<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, f)
        .await
        .unwrap_or_else(|_| panic!("test future did not finish within {limit:?}"))
}
