//! Resolve free-text addresses to coordinates.
//!
//! The [`Geocoder`] adds a region bias to every query so that short street
//! names resolve inside the operating region, takes the first candidate,
//! and never retries.

use async_trait::async_trait;
use log::debug;
use thiserror::Error;

use crate::{Coordinate, ServiceError, is_valid_coordinate};

/// Region appended to queries when none is configured.
pub const DEFAULT_REGION_BIAS: &str = "Cuenca, Ecuador";

/// A single match returned by a geocoding service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Matched position.
    pub coordinate: Coordinate,
    /// Human-readable description of the match, when supplied.
    pub display_name: Option<String>,
}

/// External geocoding service.
///
/// Implementations return candidates in descending confidence. An empty
/// list means nothing matched.
#[async_trait(?Send)]
pub trait GeocodingService {
    /// Look up `query` and return matching candidates.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ServiceError>;
}

/// Errors from [`Geocoder::resolve_address`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    /// The address text was blank.
    #[error("enter an address to search for")]
    EmptyQuery,
    /// The service found no match.
    #[error("no match found for address {query:?}")]
    AddressNotFound {
        /// Query sent to the service, including the region bias.
        query: String,
    },
    /// The service call failed or returned an unusable match.
    #[error("geocoding failed: {0}")]
    GeocodingFailed(#[source] ServiceError),
}

/// Resolves addresses through a [`GeocodingService`].
///
/// # Examples
/// ```
/// use waypost_core::Geocoder;
///
/// assert_eq!(
///     Geocoder::biased_query("Calle Larga", "Cuenca, Ecuador"),
///     "Calle Larga, Cuenca, Ecuador"
/// );
/// assert_eq!(Geocoder::biased_query(" Calle Larga ", ""), "Calle Larga");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Geocoder;

impl Geocoder {
    /// Compose the query text sent to the service.
    #[must_use]
    pub fn biased_query(text: &str, bias_region: &str) -> String {
        let text = text.trim();
        let bias_region = bias_region.trim();
        if bias_region.is_empty() {
            text.to_owned()
        } else {
            format!("{text}, {bias_region}")
        }
    }

    /// Resolve `text` to a coordinate inside `bias_region`.
    ///
    /// # Errors
    /// - [`GeocodeError::EmptyQuery`] for blank text, without calling the
    ///   service.
    /// - [`GeocodeError::AddressNotFound`] when the service returns no
    ///   candidates.
    /// - [`GeocodeError::GeocodingFailed`] when the call fails or the first
    ///   candidate is not a valid coordinate.
    pub async fn resolve_address<G>(
        &self,
        service: &G,
        text: &str,
        bias_region: &str,
    ) -> Result<Coordinate, GeocodeError>
    where
        G: GeocodingService + ?Sized,
    {
        if text.trim().is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }
        let query = Self::biased_query(text, bias_region);
        debug!("geocoding {query:?}");

        let candidates = service
            .search(&query)
            .await
            .map_err(GeocodeError::GeocodingFailed)?;
        let Some(first) = candidates.into_iter().next() else {
            return Err(GeocodeError::AddressNotFound { query });
        };
        if is_valid_coordinate(&first.coordinate) {
            Ok(first.coordinate)
        } else {
            Err(GeocodeError::GeocodingFailed(ServiceError::parse(format!(
                "geocoder returned invalid coordinate {}",
                first.coordinate
            ))))
        }
    }
}
