//! Routed paths from an external directions service.
//!
//! The [`DirectionsProvider`] trait hides the concrete routing engine. The
//! route planner treats every error from it as a reason to fall back to a
//! straight-line approximation.

use async_trait::async_trait;

use crate::{Coordinate, ServiceError};

/// A routed path between two coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    /// Ordered path geometry from origin to destination.
    pub path: Vec<Coordinate>,
    /// Travel time in seconds.
    pub duration_seconds: f64,
    /// Travel distance in metres.
    pub distance_meters: f64,
}

/// Fetch a routed path between two coordinates.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use waypost_core::{Coordinate, Directions, DirectionsProvider, ServiceError};
///
/// struct StraightProvider;
///
/// #[async_trait(?Send)]
/// impl DirectionsProvider for StraightProvider {
///     async fn route(
///         &self,
///         origin: Coordinate,
///         destination: Coordinate,
///     ) -> Result<Directions, ServiceError> {
///         Ok(Directions {
///             path: vec![origin, destination],
///             duration_seconds: 60.0,
///             distance_meters: 1000.0,
///         })
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait DirectionsProvider {
    /// Return a routed path from `origin` to `destination`.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Directions, ServiceError>;
}
