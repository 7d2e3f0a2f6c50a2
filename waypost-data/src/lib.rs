//! HTTP adapters for the Waypost map client.
//!
//! Responsibilities:
//! - Implement the `waypost-core` service traits against remote APIs.
//! - Translate wire formats into the core model.
//! - Map transport failures onto [`waypost_core::ServiceError`].
//!
//! Boundaries:
//! - Do not encode filtering, routing fallback or session rules (live in
//!   `waypost-core`).
//!
//! Adapters:
//! - [`backend::HttpPoiStore`] for the POI backend.
//! - [`routing::OrsDirectionsProvider`] for OpenRouteService directions.
//! - [`geocoding::NominatimGeocoder`] for Nominatim address search.

pub mod backend;
pub mod geocoding;
mod http;
pub mod routing;

pub use http::{BuildError, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
