pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use threadme::logging::LOG_ENV;
use tracing_subscriber::{EnvFilter, fmt};

/// Upper bound for any single async test step. Covers the SIGKILL grace
/// period of the real executor with room to spare.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary.
///
/// Uses the same `THREADME_LOG` directives as the binary (falling back to
/// `RUST_LOG`, then `warn`), and writes through the test harness so logs
/// only show for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .init();
    });
}

/// Run a future, panicking if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(f: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(out) => out,
        Err(_) => panic!("test step timed out after {TEST_TIMEOUT:?}"),
    }
}
