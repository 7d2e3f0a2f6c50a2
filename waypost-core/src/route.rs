//! Route planning between two coordinates with straight-line fallback.
//!
//! A computation moves through `Idle -> Requesting -> {Succeeded | Fallback
//! | Failed}`. Only invalid endpoints fail; any directions-service failure
//! degrades to a straight line whose length comes from
//! [`haversine_distance_km`].

use geo::LineString;
use log::{debug, warn};
use thiserror::Error;

use crate::{
    Coordinate, Directions, DirectionsProvider, ServiceError, haversine_distance_km,
    is_valid_coordinate, round_to_tenth,
};

/// Reason attached to every straight-line result.
pub const STRAIGHT_LINE_REASON: &str = "straight-line approximation; routing service unavailable";

/// Origin and destination of a route computation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteRequest {
    /// Start of the route, usually the user's location.
    pub origin: Coordinate,
    /// End of the route.
    pub destination: Coordinate,
    /// Address text or POI name the destination came from.
    pub destination_label: Option<String>,
}

impl RouteRequest {
    /// Build a request without a destination label.
    #[must_use]
    pub const fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
            destination_label: None,
        }
    }

    /// Attach the text the destination was chosen from.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.destination_label = Some(label.into());
        self
    }
}

/// Summary of a route computation.
///
/// A degraded result never carries a duration; the constructors are the
/// only way to build one.
///
/// # Examples
/// ```
/// use waypost_core::RouteResult;
///
/// let routed = RouteResult::routed(10, 2.5);
/// assert!(!routed.degraded());
///
/// let fallback = RouteResult::straight_line(1.6);
/// assert!(fallback.degraded());
/// assert_eq!(fallback.duration_minutes(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteResult {
    duration_minutes: Option<u32>,
    distance_km: f64,
    degraded: bool,
    degradation_reason: Option<String>,
}

impl RouteResult {
    /// Result backed by the directions service.
    #[must_use]
    pub const fn routed(duration_minutes: u32, distance_km: f64) -> Self {
        Self {
            duration_minutes: Some(duration_minutes),
            distance_km,
            degraded: false,
            degradation_reason: None,
        }
    }

    /// Straight-line approximation used when the service is unavailable.
    #[must_use]
    pub fn straight_line(distance_km: f64) -> Self {
        Self {
            duration_minutes: None,
            distance_km,
            degraded: true,
            degradation_reason: Some(STRAIGHT_LINE_REASON.to_owned()),
        }
    }

    /// Travel time in whole minutes, when known.
    #[must_use]
    pub const fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    /// Distance in kilometres, rounded to one decimal place.
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Whether the result is a straight-line approximation.
    #[must_use]
    pub const fn degraded(&self) -> bool {
        self.degraded
    }

    /// Why the result was degraded.
    #[must_use]
    pub fn degradation_reason(&self) -> Option<&str> {
        self.degradation_reason.as_deref()
    }
}

/// A route result together with the geometry to draw.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RoutePlan {
    /// Summary figures.
    pub result: RouteResult,
    /// Path to render, `x = longitude`, `y = latitude`.
    pub path: LineString<f64>,
}

/// Errors from [`RoutePlanner::plan`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// An endpoint was missing or not a valid coordinate.
    #[error("route needs a valid {endpoint}")]
    MissingEndpoint {
        /// Which endpoint was rejected.
        endpoint: Endpoint,
    },
}

/// Route endpoint named in [`RouteError::MissingEndpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The start of the route.
    Origin,
    /// The end of the route.
    Destination,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Origin => f.write_str("origin"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Computes routes through a [`DirectionsProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutePlanner;

impl RoutePlanner {
    /// Compute a route for `request`.
    ///
    /// Issues exactly one directions request. Service failures are not
    /// errors: they yield a degraded straight-line plan.
    ///
    /// # Errors
    /// Returns [`RouteError::MissingEndpoint`] before any request when an
    /// endpoint is invalid.
    pub async fn plan<D>(
        &self,
        provider: &D,
        request: &RouteRequest,
    ) -> Result<RoutePlan, RouteError>
    where
        D: DirectionsProvider + ?Sized,
    {
        check_endpoints(Some(request.origin), Some(request.destination))?;
        debug!(
            "requesting directions from {} to {}",
            request.origin, request.destination
        );

        let outcome = provider
            .route(request.origin, request.destination)
            .await
            .and_then(routed_plan);
        Ok(outcome.unwrap_or_else(|err| {
            warn!("directions unavailable, using straight line: {err}");
            straight_line_plan(request)
        }))
    }
}

/// Validate optional endpoints, naming the first missing one.
///
/// # Errors
/// Returns [`RouteError::MissingEndpoint`] for a missing or invalid
/// endpoint.
pub fn check_endpoints(
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
) -> Result<(Coordinate, Coordinate), RouteError> {
    let origin = origin
        .filter(is_valid_coordinate)
        .ok_or(RouteError::MissingEndpoint {
            endpoint: Endpoint::Origin,
        })?;
    let destination = destination
        .filter(is_valid_coordinate)
        .ok_or(RouteError::MissingEndpoint {
            endpoint: Endpoint::Destination,
        })?;
    Ok((origin, destination))
}

fn routed_plan(directions: Directions) -> Result<RoutePlan, ServiceError> {
    let Directions {
        path,
        duration_seconds,
        distance_meters,
    } = directions;
    let minutes = whole_minutes(duration_seconds)?;
    if !distance_meters.is_finite() || distance_meters < 0.0 {
        return Err(ServiceError::parse(format!(
            "invalid route distance {distance_meters}"
        )));
    }
    if path.len() < 2 {
        return Err(ServiceError::parse(format!(
            "route geometry has {} positions, need at least 2",
            path.len()
        )));
    }
    if path.iter().any(|point| !is_valid_coordinate(point)) {
        return Err(ServiceError::parse("route geometry contains invalid coordinates"));
    }

    let distance_km = round_to_tenth(distance_meters / 1000.0);
    Ok(RoutePlan {
        result: RouteResult::routed(minutes, distance_km),
        path: path.into_iter().map(Coordinate::to_coord).collect(),
    })
}

fn whole_minutes(duration_seconds: f64) -> Result<u32, ServiceError> {
    let minutes = (duration_seconds / 60.0).round();
    if !minutes.is_finite() || minutes < 0.0 || minutes > f64::from(u32::MAX) {
        return Err(ServiceError::parse(format!(
            "invalid route duration {duration_seconds}"
        )));
    }
    // Finite, rounded and range-checked above.
    Ok(minutes as u32)
}

fn straight_line_plan(request: &RouteRequest) -> RoutePlan {
    let distance_km = haversine_distance_km(&request.origin, &request.destination);
    RoutePlan {
        result: RouteResult::straight_line(distance_km),
        path: LineString::from(vec![
            request.origin.to_coord(),
            request.destination.to_coord(),
        ]),
    }
}
