//! HTTP client for the POI backend.
//!
//! [`HttpPoiStore`] implements [`PoiStore`] against the REST backend:
//!
//! | Operation         | Request                                          |
//! |-------------------|--------------------------------------------------|
//! | `list_points`     | `GET {base}/puntos`                              |
//! | `list_categories` | `GET {base}/puntos/categorias`                   |
//! | `create_point`    | `POST {base}/puntos`                             |
//! | `search_nearby`   | `GET {base}/puntos/cercanos?lat&lng&radio[&categoria]` |
//!
//! # Example
//!
//! ```no_run
//! use waypost_core::{Coordinate, PoiStore};
//! use waypost_data::backend::HttpPoiStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpPoiStore::new("http://localhost:8080/api")?;
//! let nearby = store
//!     .search_nearby(Coordinate::new(-2.899, -78.968), 2_000, Some("Parque"))
//!     .await?;
//! println!("{} parks nearby", nearby.len());
//! # Ok(())
//! # }
//! ```

mod schema;

pub use schema::{NewPointRecord, PointRecord};

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use url::Url;
use waypost_core::{Coordinate, NewPointOfInterest, PoiStore, PointOfInterest, ServiceError};

use crate::http::{
    BuildError, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, build_client, endpoint, fetch_json,
    parse_base_url,
};

/// Backend URL used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080/api";

/// Configuration for [`HttpPoiStore`].
#[derive(Debug, Clone)]
pub struct PoiStoreConfig {
    /// Base URL of the backend API, including the `/api` prefix.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for PoiStoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl PoiStoreConfig {
    /// Create a configuration for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
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

/// [`PoiStore`] backed by the REST backend.
#[derive(Debug)]
pub struct HttpPoiStore {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl HttpPoiStore {
    /// Create a store for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns [`BuildError`] if the URL is invalid or the client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BuildError> {
        Self::with_config(PoiStoreConfig::new(base_url))
    }

    /// Create a store from explicit configuration.
    ///
    /// # Errors
    /// Returns [`BuildError`] if the URL is invalid or the client fails to
    /// build.
    pub fn with_config(config: PoiStoreConfig) -> Result<Self, BuildError> {
        Ok(Self {
            client: build_client(&config.user_agent, config.timeout)?,
            base: parse_base_url(&config.base_url)?,
            timeout: config.timeout,
        })
    }

    /// Build the proximity query URL.
    pub(crate) fn nearby_url(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: Option<&str>,
    ) -> Result<Url, ServiceError> {
        let mut url = endpoint(&self.base, "puntos/cercanos")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("lat", &center.latitude.to_string())
                .append_pair("lng", &center.longitude.to_string())
                .append_pair("radio", &radius_meters.to_string());
            if let Some(category) = category {
                query.append_pair("categoria", category);
            }
        }
        Ok(url)
    }

    async fn get_points(&self, url: &Url) -> Result<Vec<PointOfInterest>, ServiceError> {
        let records: Vec<PointRecord> =
            fetch_json(self.client.get(url.clone()), url.as_str(), self.timeout).await?;
        Ok(into_points(records))
    }
}

/// Convert records, skipping any without a name or with unusable
/// coordinates.
pub(crate) fn into_points(records: Vec<PointRecord>) -> Vec<PointOfInterest> {
    records
        .into_iter()
        .filter_map(|record| match PointOfInterest::try_from(record) {
            Ok(poi) => Some(poi),
            Err(err) => {
                warn!("skipping backend point: {err}");
                None
            }
        })
        .collect()
}

#[async_trait(?Send)]
impl PoiStore for HttpPoiStore {
    async fn list_points(&self) -> Result<Vec<PointOfInterest>, ServiceError> {
        let url = endpoint(&self.base, "puntos")?;
        self.get_points(&url).await
    }

    async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        let url = endpoint(&self.base, "puntos/categorias")?;
        fetch_json(self.client.get(url.clone()), url.as_str(), self.timeout).await
    }

    async fn create_point(
        &self,
        point: &NewPointOfInterest,
    ) -> Result<PointOfInterest, ServiceError> {
        let location = point.validate().map_err(|err| ServiceError::Service {
            code: "InvalidPoint".to_owned(),
            message: err.to_string(),
        })?;
        let url = endpoint(&self.base, "puntos")?;
        let body = NewPointRecord::new(point, location);
        debug!("creating point {:?} at {location}", point.name);
        let record: PointRecord = fetch_json(
            self.client.post(url.clone()).json(&body),
            url.as_str(),
            self.timeout,
        )
        .await?;
        PointOfInterest::try_from(record)
    }

    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: Option<&str>,
    ) -> Result<Vec<PointOfInterest>, ServiceError> {
        let url = self.nearby_url(center, radius_meters, category)?;
        self.get_points(&url).await
    }
}
