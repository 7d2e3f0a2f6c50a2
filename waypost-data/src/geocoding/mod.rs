//! Address lookup through a Nominatim instance.
//!
//! [`NominatimGeocoder`] implements [`GeocodingService`]. Region biasing and
//! candidate selection happen in [`waypost_core::Geocoder`]; this adapter
//! only performs the search.

mod nominatim;

pub use nominatim::Place;

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;
use waypost_core::{GeocodeCandidate, GeocodingService, ServiceError};

use crate::http::{
    BuildError, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, build_client, endpoint, fetch_json,
    parse_base_url,
};

/// Public Nominatim endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Maximum number of candidates requested.
    pub limit: u8,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string; the public instance rejects anonymous clients.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_URL.to_owned(),
            limit: 1,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the candidate limit; zero is raised to one.
    #[must_use]
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`GeocodingService`] backed by Nominatim's `/search` endpoint.
#[derive(Debug)]
pub struct NominatimGeocoder {
    client: Client,
    base: Url,
    limit: u8,
    timeout: Duration,
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns [`BuildError`] if the URL is invalid or the client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a geocoder from explicit configuration.
    ///
    /// # Errors
    /// Returns [`BuildError`] if the URL is invalid or the client fails to
    /// build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, BuildError> {
        Ok(Self {
            client: build_client(&config.user_agent, config.timeout)?,
            base: parse_base_url(&config.base_url)?,
            limit: config.limit.max(1),
            timeout: config.timeout,
        })
    }

    pub(crate) fn search_url(&self, query: &str) -> Result<Url, ServiceError> {
        let mut url = endpoint(&self.base, "search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", &self.limit.to_string())
            .append_pair("addressdetails", "1");
        Ok(url)
    }
}

#[async_trait(?Send)]
impl GeocodingService for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ServiceError> {
        let url = self.search_url(query)?;
        debug!("geocoding via {url}");
        let places: Vec<Place> =
            fetch_json(self.client.get(url.clone()), url.as_str(), self.timeout).await?;
        places.into_iter().map(GeocodeCandidate::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn search_url_encodes_query() {
        let geocoder =
            NominatimGeocoder::new("https://nominatim.example.org").expect("geocoder should build");
        let url = geocoder
            .search_url("Calle Larga, Cuenca, Ecuador")
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://nominatim.example.org/search?q=Calle+Larga%2C+Cuenca%2C+Ecuador&format=json&limit=1&addressdetails=1"
        );
    }

    #[rstest]
    fn limit_is_at_least_one() {
        assert_eq!(NominatimConfig::default().with_limit(0).limit, 1);
        assert_eq!(NominatimConfig::default().with_limit(5).limit, 5);
    }
}
