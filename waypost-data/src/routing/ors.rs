//! OpenRouteService directions response types.
//!
//! The GET directions endpoint answers with a GeoJSON `FeatureCollection`.
//! Only the first feature is used: its `LineString` geometry and the
//! duration and distance of its first segment.
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/v2/directions/{profile}/get>

use serde::Deserialize;

/// Directions response body.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    /// Routes found, best first.
    #[serde(default)]
    pub features: Vec<RouteFeature>,
    /// Error payload, present instead of features on failure.
    pub error: Option<ErrorBody>,
}

/// A single route.
#[derive(Debug, Deserialize)]
pub struct RouteFeature {
    /// Route geometry.
    pub geometry: LineGeometry,
    /// Route summary figures.
    pub properties: RouteProperties,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
pub struct LineGeometry {
    /// Positions as `[longitude, latitude]`, optionally followed by
    /// elevation.
    pub coordinates: Vec<Vec<f64>>,
}

/// Properties attached to a route feature.
#[derive(Debug, Deserialize)]
pub struct RouteProperties {
    /// Per-leg figures; a two-point request has one segment.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Whole-route figures.
    pub summary: Option<Segment>,
}

/// Duration and distance of a route or route leg.
///
/// Both figures are required; a leg missing either fails to decode.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Segment {
    /// Travel time in seconds.
    pub duration: f64,
    /// Travel distance in metres.
    pub distance: f64,
}

/// Error payload returned by the service.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    /// Structured error with a numeric code.
    Detailed {
        /// Service error code.
        code: i64,
        /// Error message.
        message: String,
    },
    /// Bare error message.
    Message(String),
}

impl ErrorBody {
    /// Service error code as text, empty for bare messages.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::Detailed { code, .. } => code.to_string(),
            Self::Message(_) => String::new(),
        }
    }

    /// Error message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Detailed { message, .. } | Self::Message(message) => message,
        }
    }
}

impl RouteProperties {
    /// Figures of the first segment, or of the summary when no segments
    /// are listed.
    #[must_use]
    pub fn first_leg(&self) -> Option<Segment> {
        self.segments.first().copied().or(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-78.968, -2.899], [-78.975, -2.901, 2550.0]]
                },
                "properties": {
                    "segments": [{"distance": 2460.3, "duration": 612.4, "steps": []}],
                    "summary": {"distance": 2460.3, "duration": 612.4}
                }
            }]
        }"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.error.is_none());
        let feature = response.features.first().expect("one feature");
        assert_eq!(feature.geometry.coordinates.len(), 2);
        let leg = feature.properties.first_leg().expect("one leg");
        assert!((leg.duration - 612.4).abs() < f64::EPSILON);
        assert!((leg.distance - 2460.3).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{"error": {"code": 2010, "message": "Could not find routable point"}}"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.features.is_empty());
        let error = response.error.expect("error body");
        assert_eq!(error.code(), "2010");
        assert_eq!(error.message(), "Could not find routable point");
    }

    #[test]
    fn reject_segment_without_figures() {
        let json = r#"{"features":[{"geometry":{"coordinates":[]},"properties":{"segments":[{}]}}]}"#;

        let result = serde_json::from_str::<DirectionsResponse>(json);

        assert!(result.is_err(), "empty segment should not decode");
    }

    #[test]
    fn deserialise_bare_error_message() {
        let json = r#"{"error": "Access to this API has been disallowed"}"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        let error = response.error.expect("error body");
        assert_eq!(error.code(), "");
        assert_eq!(error.message(), "Access to this API has been disallowed");
    }
}
