//! Shared helpers for cellgraph's integration tests.

pub mod builders;
pub mod scripted;

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static TRACING: Once = Once::new();

/// Install a test-captured subscriber once per test binary.
///
/// Reads `CELLGRAPH_LOG`, then `RUST_LOG`, defaulting to `warn` so passing
/// runs stay quiet. Output only shows for failing tests unless the run
/// uses `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_env("CELLGRAPH_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
