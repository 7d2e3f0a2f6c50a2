//! Coordinate validation and great-circle distance.
//!
//! Coordinates are WGS84 degrees. [`Coordinate`] keeps latitude and
//! longitude explicit rather than relying on `x`/`y` conventions; use
//! [`Coordinate::to_coord`] when handing values to the `geo` crate.

use geo::Coord;
use thiserror::Error;

/// Earth's mean radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
///
/// The type itself does not enforce the valid ranges so that values read
/// from external services can be represented and then rejected with
/// [`is_valid_coordinate`] or [`Coordinate::checked`].
///
/// # Examples
/// ```
/// use waypost_core::Coordinate;
///
/// let cuenca = Coordinate::checked(-2.9001, -79.0059)?;
/// assert_eq!(cuenca.latitude, -2.9001);
/// # Ok::<(), waypost_core::GeoError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees, valid within `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, valid within `[-180, 180]`.
    pub longitude: f64,
}

/// Errors raised when validating coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    /// Latitude or longitude was non-finite or out of range.
    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Rejected latitude.
        latitude: f64,
        /// Rejected longitude.
        longitude: f64,
    },
}

impl Coordinate {
    /// Construct a coordinate without validating it.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Construct a coordinate, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidCoordinate`] when either component is
    /// outside its range.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        Self::new(latitude, longitude).validated()
    }

    /// Return `self` if it is a valid coordinate.
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidCoordinate`] for invalid values.
    pub fn validated(self) -> Result<Self, GeoError> {
        if is_valid_coordinate(&self) {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Convert to a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Build from a `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub const fn from_coord(coord: Coord<f64>) -> Self {
        Self::new(coord.y, coord.x)
    }

    fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        value.to_coord()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Return `true` when both components are finite and within range.
///
/// # Examples
/// ```
/// use waypost_core::{Coordinate, is_valid_coordinate};
///
/// assert!(is_valid_coordinate(&Coordinate::new(90.0, -180.0)));
/// assert!(!is_valid_coordinate(&Coordinate::new(90.1, 0.0)));
/// assert!(!is_valid_coordinate(&Coordinate::new(f64::NAN, 0.0)));
/// ```
#[must_use]
pub fn is_valid_coordinate(coordinate: &Coordinate) -> bool {
    coordinate.latitude.is_finite()
        && coordinate.longitude.is_finite()
        && (-90.0..=90.0).contains(&coordinate.latitude)
        && (-180.0..=180.0).contains(&coordinate.longitude)
}

/// Unrounded great-circle distance in kilometres.
#[must_use]
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding noise can push `a` a hair outside [0, 1] for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance in kilometres, rounded to one decimal place.
///
/// # Examples
/// ```
/// use waypost_core::{Coordinate, haversine_distance_km};
///
/// let a = Coordinate::new(-2.9, -78.97);
/// let b = Coordinate::new(-2.91, -78.98);
/// assert_eq!(haversine_distance_km(&a, &a), 0.0);
/// assert_eq!(haversine_distance_km(&a, &b), haversine_distance_km(&b, &a));
/// ```
#[must_use]
pub fn haversine_distance_km(from: &Coordinate, to: &Coordinate) -> f64 {
    round_to_tenth(haversine_km(from, to))
}

/// Round to one decimal place for display.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
