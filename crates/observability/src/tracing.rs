//! Subscriber configuration: structured JSON lines on stdout.

use tracing_subscriber::EnvFilter;

/// Set up the JSON subscriber.
///
/// The filter comes from `RUST_LOG` when set and falls back to `info`, so a
/// deployment can turn on `debug` for the fan-out path without a rebuild.
/// `try_init` keeps a second call (tests, embedded use) from panicking.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
