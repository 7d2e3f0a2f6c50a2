//! HTTP directions provider for route planning.
//!
//! This module provides [`OrsDirectionsProvider`], an implementation of
//! [`waypost_core::DirectionsProvider`] that fetches routed paths from an
//! OpenRouteService instance.
//!
//! Failures surface as [`waypost_core::ServiceError`]; the route planner in
//! `waypost-core` turns every one of them into a straight-line fallback.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use waypost_core::{Coordinate, DirectionsProvider};
//! use waypost_data::routing::{OrsConfig, OrsDirectionsProvider};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OrsConfig::default()
//!     .with_api_key("your-key")
//!     .with_timeout(Duration::from_secs(5));
//! let provider = OrsDirectionsProvider::with_config(config)?;
//!
//! let directions = provider
//!     .route(Coordinate::new(-2.899, -78.968), Coordinate::new(-2.897, -79.004))
//!     .await?;
//! println!("{} m", directions.distance_meters);
//! # Ok(())
//! # }
//! ```

mod ors;
mod provider;

pub use provider::{DEFAULT_DIRECTIONS_URL, DEFAULT_PROFILE, OrsConfig, OrsDirectionsProvider};
