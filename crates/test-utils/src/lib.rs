// crates/test-utils/src/lib.rs

//! Shared helpers for `pipedag` integration tests.
//!
//! - [`init_tracing`] / [`with_timeout`] for test scaffolding.
//! - [`fakes`] for a recording watcher and an ordered event journal.
//! - [`fixtures`] for services over an in-memory filesystem.

pub mod fakes;
pub mod fixtures;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Logs are captured per test and only printed for failing ones (unless
/// run with `-- --nocapture`). Enable levels with e.g.
/// `RUST_LOG=debug cargo test`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `fut`, failing if it takes longer than `secs` seconds.
pub async fn with_timeout<F, T>(secs: u64, fut: F) -> anyhow::Result<T>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(secs), fut)
        .await
        .map_err(|_| anyhow::anyhow!("timed out after {secs}s"))
}
