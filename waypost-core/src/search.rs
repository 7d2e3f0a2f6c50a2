//! Proximity search: search state, radius policy and the search controller.
//!
//! [`ProximitySearch`] normalises a query (valid centre, clamped radius)
//! and delegates the lookup to a [`PoiStore`]. Applying the result to the
//! session state is left to the caller, so a failed search never clears
//! what is already displayed.

use log::debug;
use thiserror::Error;

use crate::{Coordinate, GeoError, PoiStore, PointOfInterest, ServiceError};

/// Smallest search radius accepted by default, in metres.
pub const DEFAULT_MIN_RADIUS_M: u32 = 500;
/// Largest search radius accepted by default, in metres.
pub const DEFAULT_MAX_RADIUS_M: u32 = 10_000;
/// Radius used before the user picks one, in metres.
pub const DEFAULT_RADIUS_M: u32 = 2_000;

/// Inclusive bounds for the proximity-search radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusBounds {
    min: u32,
    max: u32,
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_RADIUS_M,
            max: DEFAULT_MAX_RADIUS_M,
        }
    }
}

impl RadiusBounds {
    /// Build bounds from two limits given in either order.
    #[must_use]
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Lower bound in metres.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Upper bound in metres.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Clamp `radius_meters` into the bounds.
    ///
    /// # Examples
    /// ```
    /// use waypost_core::RadiusBounds;
    ///
    /// let bounds = RadiusBounds::default();
    /// assert_eq!(bounds.clamp(50), 500);
    /// assert_eq!(bounds.clamp(50_000), 10_000);
    /// assert_eq!(bounds.clamp(2_000), 2_000);
    /// ```
    #[must_use]
    pub fn clamp(&self, radius_meters: u32) -> u32 {
        radius_meters.clamp(self.min, self.max)
    }
}

/// User-controlled inputs that decide which points are shown.
///
/// `center = None` means no proximity filter is active.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchState {
    /// Centre of the last successful proximity search.
    pub center: Option<Coordinate>,
    /// Search radius in metres.
    pub radius_meters: u32,
    /// Category filter.
    pub category: Option<String>,
    /// Free-text filter over names and descriptions.
    pub text_query: String,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            center: None,
            radius_meters: DEFAULT_RADIUS_M,
            category: None,
            text_query: String::new(),
        }
    }
}

impl SearchState {
    /// Set the active search centre.
    #[must_use]
    pub fn with_center(mut self, center: Coordinate) -> Self {
        self.center = Some(center);
        self
    }

    /// Set the category filter.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the free-text filter.
    #[must_use]
    pub fn with_text_query(mut self, query: impl Into<String>) -> Self {
        self.text_query = query.into();
        self
    }

    /// Category filter, treating a blank name as no filter.
    #[must_use]
    pub fn active_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|category| !category.trim().is_empty())
    }
}

/// Errors from [`ProximitySearch::search`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The search centre was not a valid coordinate.
    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),
    /// The store could not answer the query.
    #[error("proximity search failed: {0}")]
    SearchFailed(#[source] ServiceError),
}

/// Result of a successful proximity search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyResults {
    /// Validated search centre.
    pub center: Coordinate,
    /// Radius actually sent to the store, after clamping.
    pub radius_meters: u32,
    /// Points returned by the store.
    pub points: Vec<PointOfInterest>,
}

/// Normalises proximity queries and forwards them to a [`PoiStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProximitySearch {
    bounds: RadiusBounds,
}

impl ProximitySearch {
    /// Create a controller using `bounds` for radius clamping.
    #[must_use]
    pub const fn new(bounds: RadiusBounds) -> Self {
        Self { bounds }
    }

    /// Radius bounds applied to every search.
    #[must_use]
    pub const fn bounds(&self) -> RadiusBounds {
        self.bounds
    }

    /// Find points near `center`.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidCoordinate`] before contacting the
    /// store when `center` is invalid, and [`SearchError::SearchFailed`]
    /// when the store call fails.
    pub async fn search<S>(
        &self,
        store: &S,
        center: Coordinate,
        radius_meters: u32,
        category: Option<&str>,
    ) -> Result<NearbyResults, SearchError>
    where
        S: PoiStore + ?Sized,
    {
        let center = center.validated()?;
        let radius_meters = self.bounds.clamp(radius_meters);
        let category = category.filter(|name| !name.trim().is_empty());
        debug!("searching within {radius_meters} m of {center} (category {category:?})");

        let points = store
            .search_nearby(center, radius_meters, category)
            .await
            .map_err(SearchError::SearchFailed)?;
        Ok(NearbyResults {
            center,
            radius_meters,
            points,
        })
    }
}
