//! Nominatim search response types.
//!
//! Nominatim returns coordinates as decimal strings.

use serde::Deserialize;
use waypost_core::{Coordinate, GeocodeCandidate, ServiceError};

/// One entry of a `format=json` search response.
#[derive(Debug, Deserialize)]
pub struct Place {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Full description of the match.
    pub display_name: Option<String>,
}

impl TryFrom<Place> for GeocodeCandidate {
    type Error = ServiceError;

    fn try_from(place: Place) -> Result<Self, Self::Error> {
        let latitude = parse_degrees(&place.lat, "lat")?;
        let longitude = parse_degrees(&place.lon, "lon")?;
        Ok(Self {
            coordinate: Coordinate::new(latitude, longitude),
            display_name: place.display_name,
        })
    }
}

fn parse_degrees(text: &str, field: &str) -> Result<f64, ServiceError> {
    text.trim()
        .parse::<f64>()
        .map_err(|err| ServiceError::parse(format!("invalid {field} {text:?}: {err}")))
}
