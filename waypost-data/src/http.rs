//! Shared HTTP plumbing for the service adapters.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;
use waypost_core::ServiceError;

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "waypost/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while constructing an HTTP adapter.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL could not be parsed.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidUrl {
        /// Rejected URL text.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, BuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(BuildError::HttpClient)
}

/// Parse `base_url`, ensuring it ends with `/` so that relative joins keep
/// every existing path segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, BuildError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/")).map_err(|source| BuildError::InvalidUrl {
        url: base_url.to_owned(),
        source,
    })
}

/// Join `path` onto a base URL produced by [`parse_base_url`].
pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, ServiceError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|err| ServiceError::Network {
            url: format!("{base}{path}"),
            message: err.to_string(),
        })
}

/// Map a transport error onto the shared [`ServiceError`].
pub(crate) fn convert_reqwest_error(
    error: &reqwest::Error,
    url: &str,
    timeout: Duration,
) -> ServiceError {
    if error.is_timeout() {
        return ServiceError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return ServiceError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    if error.is_decode() {
        return ServiceError::parse(error);
    }

    ServiceError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

/// Send `request` and decode a JSON body of type `T`.
pub(crate) async fn fetch_json<T>(
    request: reqwest::RequestBuilder,
    url: &str,
    timeout: Duration,
) -> Result<T, ServiceError>
where
    T: serde::de::DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|err| convert_reqwest_error(&err, url, timeout))?
        .error_for_status()
        .map_err(|err| convert_reqwest_error(&err, url, timeout))?;
    let body = response
        .bytes()
        .await
        .map_err(|err| convert_reqwest_error(&err, url, timeout))?;
    serde_json::from_slice(&body).map_err(ServiceError::parse)
}

/// URL text without the query string, for error messages that must not
/// leak credentials.
pub(crate) fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}
