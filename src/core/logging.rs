//! Diagnostic logging setup.
//!
//! User-facing output goes through `core::output`; `tracing` events are
//! diagnostics only and go to stderr, filtered by `GOO_LOG`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GOO_LOG";

pub fn init(verbose: bool) {
    let default_level = if verbose { "goo=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
