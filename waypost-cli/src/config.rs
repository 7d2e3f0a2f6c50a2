//! Service configuration shared by every subcommand.
//!
//! Values layer as defaults, then configuration file, then `WAYPOST_*`
//! environment variables, then CLI flags.

use std::time::Duration;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waypost_core::{
    Coordinate, DEFAULT_MAX_RADIUS_M, DEFAULT_MIN_RADIUS_M, DEFAULT_REGION_BIAS,
    FixedLocationProvider, MapSession, RadiusBounds, SessionConfig,
};
use waypost_data::backend::{DEFAULT_BACKEND_URL, HttpPoiStore, PoiStoreConfig};
use waypost_data::geocoding::{DEFAULT_GEOCODER_URL, NominatimConfig, NominatimGeocoder};
use waypost_data::routing::{
    DEFAULT_DIRECTIONS_URL, DEFAULT_PROFILE, OrsConfig, OrsDirectionsProvider,
};
use waypost_data::DEFAULT_TIMEOUT_SECS;

use crate::CliError;

pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";

/// Session wired to the HTTP adapters.
pub(crate) type HttpSession =
    MapSession<HttpPoiStore, OrsDirectionsProvider, NominatimGeocoder, FixedLocationProvider>;

/// Service endpoints and session tunables.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[ortho_config(prefix = "WAYPOST")]
pub(crate) struct ServiceArgs {
    /// Base URL of the POI backend, including the `/api` prefix.
    #[arg(long, value_name = "url", global = true)]
    #[serde(default)]
    pub(crate) backend_url: Option<String>,
    /// Base URL of the OpenRouteService instance.
    #[arg(long, value_name = "url", global = true)]
    #[serde(default)]
    pub(crate) directions_url: Option<String>,
    /// OpenRouteService API key.
    #[arg(long, value_name = "key", global = true)]
    #[serde(default)]
    pub(crate) directions_api_key: Option<String>,
    /// Routing profile, such as `driving-car` or `foot-walking`.
    #[arg(long, value_name = "profile", global = true)]
    #[serde(default)]
    pub(crate) directions_profile: Option<String>,
    /// Base URL of the Nominatim instance.
    #[arg(long, value_name = "url", global = true)]
    #[serde(default)]
    pub(crate) geocoder_url: Option<String>,
    /// Region appended to every address lookup.
    #[arg(long, value_name = "region", global = true)]
    #[serde(default)]
    pub(crate) region_bias: Option<String>,
    /// Timeout for each HTTP request, in seconds.
    #[arg(long, value_name = "secs", global = true)]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Smallest proximity-search radius in metres.
    #[arg(long, value_name = "metres", global = true)]
    #[serde(default)]
    pub(crate) min_radius: Option<u32>,
    /// Largest proximity-search radius in metres.
    #[arg(long, value_name = "metres", global = true)]
    #[serde(default)]
    pub(crate) max_radius: Option<u32>,
    /// Latitude reported as the user's position.
    #[arg(long = ARG_LATITUDE, value_name = "deg", allow_negative_numbers = true, global = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude reported as the user's position.
    #[arg(long = ARG_LONGITUDE, value_name = "deg", allow_negative_numbers = true, global = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
}

impl ServiceArgs {
    pub(crate) fn into_config(self) -> Result<ServiceConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServiceConfig::try_from(merged)
    }
}

/// Resolved configuration for the adapters and the session.
#[derive(Debug, Clone)]
pub(crate) struct ServiceConfig {
    pub(crate) backend: PoiStoreConfig,
    pub(crate) directions: OrsConfig,
    pub(crate) geocoder: NominatimConfig,
    pub(crate) session: SessionConfig,
    /// Position reported by the location provider, if configured.
    pub(crate) location: Option<Coordinate>,
}

impl TryFrom<ServiceArgs> for ServiceConfig {
    type Error = CliError;

    fn try_from(args: ServiceArgs) -> Result<Self, Self::Error> {
        let timeout_secs = args.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CliError::InvalidTimeout);
        }
        let timeout = Duration::from_secs(timeout_secs);

        let location = match (args.latitude, args.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(CliError::IncompleteLocation {
                    missing: ARG_LONGITUDE,
                });
            }
            (None, Some(_)) => {
                return Err(CliError::IncompleteLocation {
                    missing: ARG_LATITUDE,
                });
            }
        };

        let backend = PoiStoreConfig::new(
            args.backend_url
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_owned()),
        )
        .with_timeout(timeout);

        let mut directions = OrsConfig::new(
            args.directions_url
                .unwrap_or_else(|| DEFAULT_DIRECTIONS_URL.to_owned()),
        )
        .with_profile(
            args.directions_profile
                .unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
        )
        .with_timeout(timeout);
        if let Some(key) = args.directions_api_key.filter(|key| !key.trim().is_empty()) {
            directions = directions.with_api_key(key);
        }

        let geocoder = NominatimConfig::new(
            args.geocoder_url
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_owned()),
        )
        .with_timeout(timeout);

        let session = SessionConfig {
            radius_bounds: RadiusBounds::new(
                args.min_radius.unwrap_or(DEFAULT_MIN_RADIUS_M),
                args.max_radius.unwrap_or(DEFAULT_MAX_RADIUS_M),
            ),
            region_bias: args
                .region_bias
                .unwrap_or_else(|| DEFAULT_REGION_BIAS.to_owned()),
        };

        Ok(Self {
            backend,
            directions,
            geocoder,
            session,
            location,
        })
    }
}

impl ServiceConfig {
    /// Build the HTTP adapters and a session over them.
    pub(crate) fn build_session(&self) -> Result<HttpSession, CliError> {
        let store = HttpPoiStore::with_config(self.backend.clone()).map_err(|source| {
            CliError::BuildAdapter {
                service: "POI backend",
                source,
            }
        })?;
        let directions =
            OrsDirectionsProvider::with_config(self.directions.clone()).map_err(|source| {
                CliError::BuildAdapter {
                    service: "directions",
                    source,
                }
            })?;
        let geocoder =
            NominatimGeocoder::with_config(self.geocoder.clone()).map_err(|source| {
                CliError::BuildAdapter {
                    service: "geocoder",
                    source,
                }
            })?;
        let locator = self
            .location
            .map_or_else(FixedLocationProvider::unavailable, FixedLocationProvider::new);
        Ok(MapSession::new(
            store,
            directions,
            geocoder,
            locator,
            self.session.clone(),
        ))
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ServiceConfig, CliError> {
    let merged = ServiceArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ServiceConfig::try_from(merged)
}
