//! Device location.

use async_trait::async_trait;
use thiserror::Error;

use crate::Coordinate;

/// Errors from [`LocationProvider::current_position`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused access to their location.
    #[error("location permission denied")]
    PermissionDenied,
    /// No position could be determined.
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the user's current position.
#[async_trait(?Send)]
pub trait LocationProvider {
    /// Resolve the current position.
    async fn current_position(&self) -> Result<Coordinate, LocationError>;
}

/// A provider that reports a configured position, or unavailability when
/// none is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedLocationProvider {
    position: Option<Coordinate>,
}

impl FixedLocationProvider {
    /// Report `position` on every call.
    #[must_use]
    pub const fn new(position: Coordinate) -> Self {
        Self {
            position: Some(position),
        }
    }

    /// Report unavailability on every call.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { position: None }
    }
}

#[async_trait(?Send)]
impl LocationProvider for FixedLocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationError> {
        self.position
            .ok_or_else(|| LocationError::Unavailable("no position configured".to_owned()))
    }
}
