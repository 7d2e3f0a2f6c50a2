//! Access to the POI backend.
//!
//! The `PoiStore` trait abstracts the service that owns points of interest.
//! The core only reads from it, except for forwarding the create-point form.

use async_trait::async_trait;

use crate::{Coordinate, NewPointOfInterest, PointOfInterest, ServiceError};

/// Remote store of points of interest.
///
/// Implementations perform I/O; every method may suspend. Results are
/// returned in the order the backend supplies them and callers must not
/// assume any sort order.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use waypost_core::{Coordinate, NewPointOfInterest, PoiStore, PointOfInterest, ServiceError};
///
/// struct EmptyStore;
///
/// #[async_trait(?Send)]
/// impl PoiStore for EmptyStore {
///     async fn list_points(&self) -> Result<Vec<PointOfInterest>, ServiceError> {
///         Ok(Vec::new())
///     }
///     async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
///         Ok(Vec::new())
///     }
///     async fn create_point(
///         &self,
///         _point: &NewPointOfInterest,
///     ) -> Result<PointOfInterest, ServiceError> {
///         Err(ServiceError::parse("read-only store"))
///     }
///     async fn search_nearby(
///         &self,
///         _center: Coordinate,
///         _radius_meters: u32,
///         _category: Option<&str>,
///     ) -> Result<Vec<PointOfInterest>, ServiceError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait(?Send)]
pub trait PoiStore {
    /// Return every point known to the backend.
    async fn list_points(&self) -> Result<Vec<PointOfInterest>, ServiceError>;

    /// Return the category names the backend accepts.
    async fn list_categories(&self) -> Result<Vec<String>, ServiceError>;

    /// Persist a validated create-point form and return the stored point.
    async fn create_point(
        &self,
        point: &NewPointOfInterest,
    ) -> Result<PointOfInterest, ServiceError>;

    /// Return points within `radius_meters` of `center`, optionally
    /// restricted to one category.
    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: Option<&str>,
    ) -> Result<Vec<PointOfInterest>, ServiceError>;
}
