//! Failure modes shared by every external collaborator.
//!
//! The POI store, directions service and geocoder all talk to remote
//! services. They report failures with [`ServiceError`] so that each core
//! component can map them onto its own user-facing condition.

use thiserror::Error;

/// Errors returned by external services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request could not reach the service.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error message.
        message: String,
    },
    /// The service did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message from the client or response body.
        message: String,
    },
    /// The response body did not match the expected format.
    #[error("failed to parse service response: {message}")]
    Parse {
        /// Decoder message.
        message: String,
    },
    /// The service reported an application-level error.
    #[error("service error {code}: {message}")]
    Service {
        /// Service error code.
        code: String,
        /// Service error message.
        message: String,
    },
}

impl ServiceError {
    /// Build a [`ServiceError::Parse`] from any displayable error.
    pub fn parse(message: impl std::fmt::Display) -> Self {
        Self::Parse {
            message: message.to_string(),
        }
    }
}
