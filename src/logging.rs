//! Logging setup, powered by tracing-subscriber.
//!
//! Events go to stderr so they never mix with command output on stdout.

use std::error::Error;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, `level` otherwise.
///
/// Noisy HTTP internals are capped at `warn` unless `RUST_LOG` says more.
pub fn build_env_filter(level: &str) -> Result<EnvFilter, Box<dyn Error>> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directives = format!("{},hyper=warn,reqwest=warn,rustls=warn", level);
    EnvFilter::try_new(&directives)
        .map_err(|e| format!("Invalid log level '{}': {}", level, e).into())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(level: &str) -> Result<(), Box<dyn Error>> {
    let filter = build_env_filter(level)?;
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
    Ok(())
}
