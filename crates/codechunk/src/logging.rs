//! Tracing subscriber setup

use codechunk_config::LoggingConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to stderr
///
/// `RUST_LOG` wins over the configured level. The returned guard must be
/// held until exit so buffered lines are flushed.
pub fn init(config: &LoggingConfig) -> WorkerGuard {
    let (stderr_writer, guard): (NonBlocking, WorkerGuard) =
        tracing_appender::non_blocking(std::io::stderr());

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_writer(stderr_writer)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(stderr_writer)
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    guard
}
