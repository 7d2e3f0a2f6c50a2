//! User-facing status conditions raised by session operations.

use std::fmt;

use crate::{
    Endpoint, GeocodeError, LocationError, PointOfInterestError, RouteError, SearchError,
    ServiceError,
};

/// The most recent condition the user should be told about.
///
/// Every variant except [`StatusSignal::RouteDegraded`] reports a failed
/// operation; none of them stop the session.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusSignal {
    /// A search centre was outside the valid coordinate ranges.
    InvalidCoordinate(String),
    /// The POI store could not answer a proximity search.
    SearchFailed(String),
    /// A route was requested without a usable endpoint.
    MissingEndpoint(Endpoint),
    /// An address search was submitted with blank text.
    EmptyQuery,
    /// The geocoder found nothing for the query.
    AddressNotFound(String),
    /// The geocoder call failed.
    GeocodingFailed(String),
    /// The user's position could not be determined.
    LocationUnavailable(String),
    /// Points or categories could not be loaded.
    LoadFailed(String),
    /// The create-point form was rejected before submission.
    InvalidPoint(PointOfInterestError),
    /// The store refused to create a point.
    CreateFailed(String),
    /// The route shown is a straight-line approximation.
    RouteDegraded(String),
}

impl StatusSignal {
    /// Whether the signal reports a failure rather than a notice.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::RouteDegraded(_))
    }

    pub(crate) fn load_failed(error: &ServiceError) -> Self {
        Self::LoadFailed(error.to_string())
    }

    pub(crate) fn create_failed(error: &ServiceError) -> Self {
        Self::CreateFailed(error.to_string())
    }
}

impl From<&SearchError> for StatusSignal {
    fn from(error: &SearchError) -> Self {
        match error {
            SearchError::InvalidCoordinate(inner) => Self::InvalidCoordinate(inner.to_string()),
            SearchError::SearchFailed(inner) => Self::SearchFailed(inner.to_string()),
        }
    }
}

impl From<&RouteError> for StatusSignal {
    fn from(error: &RouteError) -> Self {
        match error {
            RouteError::MissingEndpoint { endpoint } => Self::MissingEndpoint(*endpoint),
        }
    }
}

impl From<&GeocodeError> for StatusSignal {
    fn from(error: &GeocodeError) -> Self {
        match error {
            GeocodeError::EmptyQuery => Self::EmptyQuery,
            GeocodeError::AddressNotFound { query } => Self::AddressNotFound(query.clone()),
            GeocodeError::GeocodingFailed(inner) => Self::GeocodingFailed(inner.to_string()),
        }
    }
}

impl From<&LocationError> for StatusSignal {
    fn from(error: &LocationError) -> Self {
        Self::LocationUnavailable(error.to_string())
    }
}

impl fmt::Display for StatusSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate(detail) => write!(f, "invalid coordinate: {detail}"),
            Self::SearchFailed(detail) => write!(f, "could not search nearby points: {detail}"),
            Self::MissingEndpoint(Endpoint::Origin) => {
                f.write_str("locate yourself before requesting a route")
            }
            Self::MissingEndpoint(Endpoint::Destination) => {
                f.write_str("choose a valid destination for the route")
            }
            Self::EmptyQuery => f.write_str("enter an address to search for"),
            Self::AddressNotFound(query) => write!(f, "address not found: {query}"),
            Self::GeocodingFailed(detail) => write!(f, "could not look up the address: {detail}"),
            Self::LocationUnavailable(detail) => {
                write!(f, "could not determine your location: {detail}")
            }
            Self::LoadFailed(detail) => write!(f, "could not load points: {detail}"),
            Self::InvalidPoint(reason) => write!(f, "point not saved: {reason}"),
            Self::CreateFailed(detail) => write!(f, "could not save the point: {detail}"),
            Self::RouteDegraded(reason) => write!(f, "route shown as a {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeoError;
    use rstest::rstest;

    #[rstest]
    fn degraded_route_is_a_notice() {
        assert!(!StatusSignal::RouteDegraded("x".into()).is_error());
        assert!(StatusSignal::EmptyQuery.is_error());
    }

    #[rstest]
    fn invalid_centre_maps_to_invalid_coordinate() {
        let error = SearchError::from(GeoError::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.0,
        });
        assert!(matches!(
            StatusSignal::from(&error),
            StatusSignal::InvalidCoordinate(_)
        ));
    }

    #[rstest]
    fn missing_origin_asks_for_location() {
        let error = RouteError::MissingEndpoint {
            endpoint: Endpoint::Origin,
        };
        let status = StatusSignal::from(&error);
        assert_eq!(status, StatusSignal::MissingEndpoint(Endpoint::Origin));
        assert!(status.to_string().contains("locate yourself"));
    }
}
