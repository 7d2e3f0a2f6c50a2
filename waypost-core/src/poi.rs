//! Points of interest and the create-point form.

use thiserror::Error;

use crate::geo_math::{Coordinate, is_valid_coordinate};

/// A location published by the POI backend.
///
/// The core never mutates these values; it only filters and reads them.
///
/// # Examples
/// ```
/// use waypost_core::{Coordinate, PointOfInterest};
///
/// let poi = PointOfInterest::new(
///     1,
///     "Restaurante El Sabor",
///     "Restaurante",
///     Coordinate::new(-2.9, -78.97),
/// )
/// .with_description("Comida típica");
///
/// assert_eq!(poi.id, 1);
/// assert_eq!(poi.description.as_deref(), Some("Comida típica"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOfInterest {
    /// Backend identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Category name, one of the backend's category set.
    pub category: String,
    /// Postal address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact e-mail.
    pub email: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Position of the point.
    pub location: Coordinate,
}

impl PointOfInterest {
    /// Construct a point with the required fields and no contact details.
    #[must_use]
    pub fn new(
        id: u64,
        name: impl Into<String>,
        category: impl Into<String>,
        location: Coordinate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            category: category.into(),
            address: None,
            phone: None,
            email: None,
            website: None,
            location,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Label used when routing to this point: the address when known,
    /// otherwise the name.
    #[must_use]
    pub fn route_label(&self) -> &str {
        self.address
            .as_deref()
            .filter(|address| !address.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// Errors returned by [`NewPointOfInterest::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointOfInterestError {
    /// The name was empty or whitespace.
    #[error("a name is required")]
    MissingName,
    /// No location was picked on the map.
    #[error("a location must be selected on the map")]
    MissingLocation,
    /// The picked location was outside the valid coordinate ranges.
    #[error("the selected location is not a valid coordinate")]
    InvalidLocation,
    /// No category was chosen.
    #[error("a category is required")]
    MissingCategory,
}

/// Fields collected by the create-point form.
///
/// `location` stays `None` until the user picks a point on the map.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewPointOfInterest {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Category name.
    pub category: String,
    /// Postal address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact e-mail.
    pub email: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Position picked on the map.
    pub location: Option<Coordinate>,
}

impl NewPointOfInterest {
    /// Record a location picked on the map.
    #[must_use]
    pub fn with_location(mut self, location: Coordinate) -> Self {
        self.location = Some(location);
        self
    }

    /// Check the form before it is submitted to the store.
    ///
    /// Checks run in the order the form reports them: name, location,
    /// category.
    ///
    /// # Errors
    /// Returns the first [`PointOfInterestError`] found.
    pub fn validate(&self) -> Result<Coordinate, PointOfInterestError> {
        if self.name.trim().is_empty() {
            return Err(PointOfInterestError::MissingName);
        }
        let location = self.location.ok_or(PointOfInterestError::MissingLocation)?;
        if !is_valid_coordinate(&location) {
            return Err(PointOfInterestError::InvalidLocation);
        }
        if self.category.trim().is_empty() {
            return Err(PointOfInterestError::MissingCategory);
        }
        Ok(location)
    }
}
