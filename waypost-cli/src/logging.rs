//! Log subscriber for the binary.
//!
//! Library crates log through the `log` facade; the subscriber's
//! `tracing-log` bridge forwards those records. Output goes to stderr so
//! stdout carries only JSON.

use tracing_subscriber::EnvFilter;

use crate::CliError;

/// Filter used when `RUST_LOG` is unset or invalid.
pub(crate) const DEFAULT_FILTER: &str = "warn";

pub(crate) fn init() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| CliError::Logging {
            message: err.to_string(),
        })
}
