//! Structured logging on stderr.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Install a JSON subscriber for the current thread.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `verbose`.
/// Logging stops when the guard is dropped.
pub fn init(verbose: bool) -> DefaultGuard {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_default(subscriber)
}
