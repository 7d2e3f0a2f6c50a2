//! Core domain logic for the Waypost map client.
//!
//! The crate holds the point-of-interest model, great-circle maths, the
//! client-side filter engine, proximity search, route planning with a
//! straight-line fallback, address geocoding and the map session that ties
//! them together. External services are reached through the async traits
//! [`PoiStore`], [`DirectionsProvider`], [`GeocodingService`] and
//! [`LocationProvider`]; HTTP implementations live in `waypost-data`.
//!
//! Everything here is single-threaded. Futures are `?Send` and the session
//! keeps its state behind a `RefCell`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod category;
pub mod directions;
pub mod filter;
pub mod geo_math;
pub mod geocode;
pub mod location;
pub mod poi;
pub mod route;
pub mod search;
pub mod sequence;
pub mod service;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use category::CategoryMarker;
pub use directions::{Directions, DirectionsProvider};
pub use filter::{VisibleSet, compute_visible_set};
pub use geo_math::{
    Coordinate, EARTH_RADIUS_KM, GeoError, haversine_distance_km, haversine_km,
    is_valid_coordinate, round_to_tenth,
};
pub use geocode::{DEFAULT_REGION_BIAS, GeocodeCandidate, GeocodeError, Geocoder, GeocodingService};
pub use location::{FixedLocationProvider, LocationError, LocationProvider};
pub use poi::{NewPointOfInterest, PointOfInterest, PointOfInterestError};
pub use route::{
    Endpoint, RouteError, RoutePlan, RoutePlanner, RouteRequest, RouteResult,
    STRAIGHT_LINE_REASON, check_endpoints,
};
pub use search::{
    DEFAULT_MAX_RADIUS_M, DEFAULT_MIN_RADIUS_M, DEFAULT_RADIUS_M, NearbyResults,
    ProximitySearch, RadiusBounds, SearchError, SearchState,
};
pub use sequence::{RequestId, RequestSequencer};
pub use service::ServiceError;
pub use session::{
    MapSession, Operation, RouteView, SessionConfig, SessionError, SessionEvent, SessionState,
    StatusSignal, reduce,
};
pub use store::PoiStore;
