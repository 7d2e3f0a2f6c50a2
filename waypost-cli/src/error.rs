//! Error types emitted by the Waypost CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use thiserror::Error;
use waypost_core::{GeocodeError, SessionError};
use waypost_data::BuildError;

/// Errors emitted by the Waypost CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// Only one half of the user's position was configured.
    #[error("missing {missing} (set both --latitude and --longitude, or neither)")]
    IncompleteLocation { missing: &'static str },
    /// The request timeout must be positive.
    #[error("timeout-secs must be greater than zero")]
    InvalidTimeout,
    /// A `lat,lon` argument could not be parsed.
    #[error("{field} expects `latitude,longitude`, got {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
    /// Constructing an HTTP adapter failed.
    #[error("failed to build {service} client: {source}")]
    BuildAdapter {
        service: &'static str,
        #[source]
        source: BuildError,
    },
    /// The async runtime could not start.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {message}")]
    Logging { message: String },
    /// A map session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// A standalone address lookup failed.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    /// Serialising the command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
