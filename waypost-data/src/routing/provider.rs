//! `DirectionsProvider` backed by the OpenRouteService directions API.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use url::Url;
use waypost_core::{Coordinate, Directions, DirectionsProvider, ServiceError};

use super::ors::{DirectionsResponse, RouteFeature};
use crate::http::{
    BuildError, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, build_client, endpoint, fetch_json,
    parse_base_url, redacted,
};

/// Public OpenRouteService endpoint.
pub const DEFAULT_DIRECTIONS_URL: &str = "https://api.openrouteservice.org";

/// Routing profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "driving-car";

/// Configuration for [`OrsDirectionsProvider`].
#[derive(Clone)]
pub struct OrsConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// API key sent as the `api_key` query parameter.
    pub api_key: Option<String>,
    /// Routing profile, such as `driving-car` or `foot-walking`.
    pub profile: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for OrsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("profile", &self.profile)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_URL.to_owned(),
            api_key: None,
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OrsConfig {
    /// Create a configuration for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
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

/// Fetches routed paths from OpenRouteService.
///
/// Each call issues one `GET {base}/v2/directions/{profile}` request with
/// `start` and `end` given as `longitude,latitude`.
pub struct OrsDirectionsProvider {
    client: Client,
    base: Url,
    config: OrsConfig,
}

impl std::fmt::Debug for OrsDirectionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsDirectionsProvider")
            .field("base", &self.base.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OrsDirectionsProvider {
    /// Create a provider for `base_url` with default settings.
    ///
    /// # Errors
    /// Returns [`BuildError`] if the URL is invalid or the client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BuildError> {
        Self::with_config(OrsConfig::new(base_url))
    }

    /// Create a provider from explicit configuration.
    ///
    /// # Errors
    /// Returns [`BuildError`] if the URL is invalid or the client fails to
    /// build.
    pub fn with_config(config: OrsConfig) -> Result<Self, BuildError> {
        Ok(Self {
            client: build_client(&config.user_agent, config.timeout)?,
            base: parse_base_url(&config.base_url)?,
            config,
        })
    }

    /// Build the directions URL for a two-point route.
    pub(crate) fn directions_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Url, ServiceError> {
        let path = format!("v2/directions/{}", self.config.profile.trim_matches('/'));
        let mut url = endpoint(&self.base, &path)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = self.config.api_key.as_deref() {
                query.append_pair("api_key", key);
            }
            query
                .append_pair("start", &lon_lat(origin))
                .append_pair("end", &lon_lat(destination));
        }
        Ok(url)
    }
}

fn lon_lat(coordinate: Coordinate) -> String {
    format!("{},{}", coordinate.longitude, coordinate.latitude)
}

/// Convert a directions response into core [`Directions`].
pub(crate) fn convert_response(response: DirectionsResponse) -> Result<Directions, ServiceError> {
    if let Some(error) = response.error {
        return Err(ServiceError::Service {
            code: error.code(),
            message: error.message().to_owned(),
        });
    }

    let RouteFeature {
        geometry,
        properties,
    } = response
        .features
        .into_iter()
        .next()
        .ok_or_else(|| ServiceError::parse("directions response contains no route"))?;
    let leg = properties
        .first_leg()
        .ok_or_else(|| ServiceError::parse("directions response has no segment summary"))?;

    let path = geometry
        .coordinates
        .iter()
        .map(|position| match position.as_slice() {
            [longitude, latitude, ..] => Ok(Coordinate::new(*latitude, *longitude)),
            _ => Err(ServiceError::parse(format!(
                "route position {position:?} has fewer than two values"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Directions {
        path,
        duration_seconds: leg.duration,
        distance_meters: leg.distance,
    })
}

#[async_trait(?Send)]
impl DirectionsProvider for OrsDirectionsProvider {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Directions, ServiceError> {
        let url = self.directions_url(origin, destination)?;
        let shown = redacted(&url);
        debug!("requesting directions from {shown}");
        let response: DirectionsResponse =
            fetch_json(self.client.get(url), &shown, self.config.timeout).await?;
        convert_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::ors::{ErrorBody, LineGeometry, RouteProperties, Segment};
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> OrsDirectionsProvider {
        OrsDirectionsProvider::with_config(
            OrsConfig::new("https://ors.example.org/").with_api_key("k3y"),
        )
        .expect("provider should build")
    }

    fn feature(coordinates: Vec<Vec<f64>>, segments: Vec<Segment>) -> RouteFeature {
        RouteFeature {
            geometry: LineGeometry { coordinates },
            properties: RouteProperties {
                segments,
                summary: None,
            },
        }
    }

    #[rstest]
    fn directions_url_uses_lon_lat_order(provider: OrsDirectionsProvider) {
        let url = provider
            .directions_url(Coordinate::new(-2.899, -78.968), Coordinate::new(-2.9, -79.0))
            .expect("valid url");
        assert_eq!(
            url.as_str(),
            "https://ors.example.org/v2/directions/driving-car?api_key=k3y&start=-78.968%2C-2.899&end=-79%2C-2.9"
        );
    }

    #[rstest]
    fn directions_url_honours_profile() {
        let provider = OrsDirectionsProvider::with_config(
            OrsConfig::new("http://localhost:8082/ors").with_profile("foot-walking"),
        )
        .expect("provider should build");
        let url = provider
            .directions_url(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0))
            .expect("valid url");
        assert!(url.as_str().starts_with("http://localhost:8082/ors/v2/directions/foot-walking?start="));
    }

    #[rstest]
    fn convert_response_swaps_axes() {
        let response = DirectionsResponse {
            features: vec![feature(
                vec![vec![-78.968, -2.899], vec![-78.97, -2.9, 2_550.0]],
                vec![Segment {
                    duration: 612.0,
                    distance: 2_460.0,
                }],
            )],
            error: None,
        };
        let directions = convert_response(response).expect("should convert");
        assert_eq!(
            directions.path,
            vec![Coordinate::new(-2.899, -78.968), Coordinate::new(-2.9, -78.97)]
        );
        assert!((directions.duration_seconds - 612.0).abs() < f64::EPSILON);
        assert!((directions.distance_meters - 2_460.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn convert_response_reports_service_error() {
        let response = DirectionsResponse {
            features: Vec::new(),
            error: Some(ErrorBody::Detailed {
                code: 2010,
                message: "Could not find routable point".into(),
            }),
        };
        let err = convert_response(response).expect_err("should fail");
        assert_eq!(
            err,
            ServiceError::Service {
                code: "2010".into(),
                message: "Could not find routable point".into(),
            }
        );
    }

    #[rstest]
    fn convert_response_rejects_empty_route_list() {
        let response = DirectionsResponse {
            features: Vec::new(),
            error: None,
        };
        let err = convert_response(response).expect_err("should fail");
        assert!(matches!(err, ServiceError::Parse { .. }));
    }

    #[rstest]
    fn convert_response_rejects_short_positions() {
        let response = DirectionsResponse {
            features: vec![feature(
                vec![vec![-78.968]],
                vec![Segment {
                    duration: 1.0,
                    distance: 1.0,
                }],
            )],
            error: None,
        };
        let err = convert_response(response).expect_err("should fail");
        assert!(matches!(err, ServiceError::Parse { .. }));
    }

    #[rstest]
    fn debug_output_hides_the_key() {
        let config = OrsConfig::default().with_api_key("secret");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
