//! Tracing subscriber setup.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_filter` when unset.
///
/// Idempotent: later calls, or a subscriber installed elsewhere, are left alone.
pub fn init_tracing(default_filter: &str) {
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        fmt().with_env_filter(filter).with_target(true).try_init().ok();
    });
}

/// Quiet subscriber writing through the test harness capture.
///
/// Reads `TEST_LOG` first, then `RUST_LOG`, and defaults to `warn`.
pub fn init_test_tracing() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt().with_env_filter(filter).with_test_writer().without_time().try_init().ok();
    });
}
