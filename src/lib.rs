//! Facade crate for the Waypost map client.
//!
//! This crate re-exports the core domain types and, behind the `http`
//! feature, the HTTP adapters for the POI backend, OpenRouteService and
//! Nominatim.

#![forbid(unsafe_code)]

pub use waypost_core::{
    CategoryMarker, Coordinate, Directions, DirectionsProvider, FixedLocationProvider,
    GeocodeCandidate, GeocodeError, Geocoder, GeocodingService, LocationError, LocationProvider,
    MapSession, NearbyResults, NewPointOfInterest, PoiStore, PointOfInterest,
    PointOfInterestError, ProximitySearch, RadiusBounds, RequestId, RouteError, RoutePlan,
    RoutePlanner, RouteRequest, RouteResult, SearchError, SearchState, ServiceError,
    SessionConfig, SessionError, SessionEvent, SessionState, StatusSignal, VisibleSet,
    compute_visible_set, haversine_distance_km, reduce,
};

#[cfg(feature = "test-support")]
pub use waypost_core::test_support;

/// HTTP adapters for the external services.
#[cfg(feature = "http")]
pub mod http {
    pub use waypost_data::backend::{HttpPoiStore, PoiStoreConfig};
    pub use waypost_data::geocoding::{NominatimConfig, NominatimGeocoder};
    pub use waypost_data::routing::{OrsConfig, OrsDirectionsProvider};
    pub use waypost_data::{BuildError, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
}
