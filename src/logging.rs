// ==========================================
// Logging setup
// ==========================================
// tracing + tracing-subscriber, level configured
// through the RUST_LOG environment variable.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// # Environment
/// - `RUST_LOG`: filter directive (default: `info`),
///   e.g. `RUST_LOG=debug` or `RUST_LOG=seguimiento=trace`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Initialize tracing for tests.
///
/// More verbose than the default and routed through the
/// test writer so output stays attached to the failing test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
