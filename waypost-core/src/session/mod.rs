//! Map session: state snapshots, the reducer and the driver that runs
//! operations against the external collaborators.
//!
//! [`MapSession`] is single-threaded. It issues a [`RequestId`] for every
//! search and route computation and feeds each completion through
//! [`reduce`], which drops results from superseded requests.

mod state;
mod status;

pub use state::{RouteView, SessionEvent, SessionState, reduce};
pub use status::StatusSignal;

use std::cell::RefCell;
use std::fmt;

use log::{debug, info};
use thiserror::Error;

use crate::{
    Coordinate, DEFAULT_REGION_BIAS, DirectionsProvider, Endpoint, GeocodeError, Geocoder,
    GeocodingService, LocationError, LocationProvider, NearbyResults, NewPointOfInterest,
    PoiStore, PointOfInterest, PointOfInterestError, ProximitySearch, RadiusBounds, RequestId,
    RequestSequencer, RouteError, RoutePlan, RoutePlanner, RouteRequest, SearchError,
    ServiceError, check_endpoints, is_valid_coordinate,
};

/// Tunables for a [`MapSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bounds applied to the proximity-search radius.
    pub radius_bounds: RadiusBounds,
    /// Region appended to address queries.
    pub region_bias: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            radius_bounds: RadiusBounds::default(),
            region_bias: DEFAULT_REGION_BIAS.to_owned(),
        }
    }
}

/// Operation kinds that are sequenced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Proximity search.
    Search,
    /// Route computation.
    Route,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => f.write_str("search"),
            Self::Route => f.write_str("route"),
        }
    }
}

/// Errors returned by [`MapSession`] operations.
///
/// The same condition is also recorded as the session's
/// [`StatusSignal`], except for [`SessionError::Superseded`] and
/// [`SessionError::UnknownPoint`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Loading points or categories failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// A proximity search failed.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// A route was rejected before any request.
    #[error(transparent)]
    Route(#[from] RouteError),
    /// A destination address could not be resolved.
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    /// The user's position could not be determined.
    #[error(transparent)]
    Location(#[from] LocationError),
    /// The create-point form was rejected.
    #[error(transparent)]
    InvalidPoint(#[from] PointOfInterestError),
    /// No point with the given id is known to the session.
    #[error("no point with id {id}")]
    UnknownPoint {
        /// Requested id.
        id: u64,
    },
    /// A newer request of the same kind replaced this one.
    #[error("superseded by a newer {operation} request")]
    Superseded {
        /// Kind of the superseded request.
        operation: Operation,
    },
}

/// Drives map operations and keeps the resulting [`SessionState`].
///
/// Operations borrow the session immutably, so several may be in flight
/// at once on a single-threaded executor. State is never borrowed across
/// an `.await`.
#[derive(Debug)]
pub struct MapSession<S, D, G, L> {
    store: S,
    directions: D,
    geocoder: G,
    locator: L,
    config: SessionConfig,
    state: RefCell<SessionState>,
    searches: RequestSequencer,
    routes: RequestSequencer,
}

impl<S, D, G, L> MapSession<S, D, G, L>
where
    S: PoiStore,
    D: DirectionsProvider,
    G: GeocodingService,
    L: LocationProvider,
{
    /// Create a session with empty state.
    pub fn new(store: S, directions: D, geocoder: G, locator: L, config: SessionConfig) -> Self {
        let state = SessionState::new(config.radius_bounds);
        Self {
            store,
            directions,
            geocoder,
            locator,
            config,
            state: RefCell::new(state),
            searches: RequestSequencer::default(),
            routes: RequestSequencer::default(),
        }
    }

    /// Session configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The POI store backing the session.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The directions provider used for routes.
    pub const fn directions(&self) -> &D {
        &self.directions
    }

    /// The geocoding service used for address routes.
    pub const fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Run `f` against the current state without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Points passing the current filters, in display order.
    pub fn visible(&self) -> Vec<PointOfInterest> {
        self.with_state(|state| state.visible().visible.into_iter().cloned().collect())
    }

    /// Apply `event` to the session state.
    pub fn dispatch(&self, event: SessionEvent) {
        let next = reduce(&self.state.borrow(), event);
        *self.state.borrow_mut() = next;
    }

    /// Fetch all points and categories from the store.
    ///
    /// Both requests are made even when the first fails.
    ///
    /// # Errors
    /// Returns the first [`ServiceError`] encountered.
    pub async fn load(&self) -> Result<(), SessionError> {
        let points = self.store.list_points().await;
        let categories = self.store.list_categories().await;
        let points = self.apply_loaded(points, SessionEvent::PointsLoaded);
        let categories = self.apply_loaded(categories, SessionEvent::CategoriesLoaded);
        points.and(categories).map_err(SessionError::from)
    }

    /// Select a category filter; `None` or a blank name clears it.
    pub fn set_category(&self, category: Option<String>) {
        self.dispatch(SessionEvent::CategorySelected(category));
    }

    /// Replace the free-text filter.
    pub fn set_text_query(&self, query: impl Into<String>) {
        self.dispatch(SessionEvent::TextQueryChanged(query.into()));
    }

    /// Set the search radius, clamped into the configured bounds.
    pub fn set_radius(&self, radius_meters: u32) {
        self.dispatch(SessionEvent::RadiusChanged(radius_meters));
    }

    /// Search for points around `center` using the current radius and
    /// category.
    ///
    /// # Errors
    /// Returns [`SessionError::Search`] when the search fails and
    /// [`SessionError::Superseded`] when a newer search or a clear was
    /// issued before this one completed.
    pub async fn search_at(&self, center: Coordinate) -> Result<NearbyResults, SessionError> {
        let id = self.searches.issue();
        self.dispatch(SessionEvent::SearchStarted { id });
        let (radius, category) = self.with_state(|state| {
            (
                state.search.radius_meters,
                state.search.active_category().map(str::to_owned),
            )
        });

        let outcome = ProximitySearch::new(self.config.radius_bounds)
            .search(&self.store, center, radius, category.as_deref())
            .await;
        match outcome {
            Ok(results) => {
                self.dispatch(SessionEvent::SearchSucceeded {
                    id,
                    results: results.clone(),
                });
                ensure_latest(&self.searches, id, Operation::Search)?;
                Ok(results)
            }
            Err(error) => {
                self.dispatch(SessionEvent::SearchFailed {
                    id,
                    error: error.clone(),
                });
                ensure_latest(&self.searches, id, Operation::Search)?;
                Err(error.into())
            }
        }
    }

    /// Leave proximity mode and show all points again.
    pub fn clear_search(&self) {
        self.searches.issue();
        self.dispatch(SessionEvent::SearchCleared);
    }

    /// Determine the user's position and remember it.
    ///
    /// # Errors
    /// Returns [`SessionError::Location`] when the provider fails.
    pub async fn locate_user(&self) -> Result<Coordinate, SessionError> {
        match self.locator.current_position().await {
            Ok(position) => {
                info!("user located at {position}");
                self.dispatch(SessionEvent::UserLocated(position));
                Ok(position)
            }
            Err(error) => {
                self.dispatch(SessionEvent::LocationFailed(error.clone()));
                Err(error.into())
            }
        }
    }

    /// Locate the user, then search around their position.
    ///
    /// # Errors
    /// Propagates failures from [`Self::locate_user`] and
    /// [`Self::search_at`].
    pub async fn search_near_user(&self) -> Result<NearbyResults, SessionError> {
        let position = self.locate_user().await?;
        self.search_at(position).await
    }

    /// Route from the user's position to `destination`.
    ///
    /// # Errors
    /// Returns [`SessionError::Route`] when the user has not been located
    /// or `destination` is invalid, and [`SessionError::Superseded`] when a
    /// newer route or a clear was issued first. Directions failures are
    /// not errors; they produce a degraded plan.
    pub async fn route_to(
        &self,
        destination: Coordinate,
        label: Option<String>,
    ) -> Result<RoutePlan, SessionError> {
        let id = self.begin_route();
        self.plan_route(id, destination, label).await
    }

    /// Route to a known point, labelled with its address or name.
    ///
    /// # Errors
    /// Returns [`SessionError::UnknownPoint`] when no point has `poi_id`,
    /// otherwise as [`Self::route_to`].
    pub async fn route_to_point(&self, poi_id: u64) -> Result<RoutePlan, SessionError> {
        let target = self.with_state(|state| {
            state
                .find_point(poi_id)
                .map(|poi| (poi.location, poi.route_label().to_owned()))
        });
        let (destination, label) = target.ok_or(SessionError::UnknownPoint { id: poi_id })?;
        self.route_to(destination, Some(label)).await
    }

    /// Geocode `address` inside the configured region, then route to it.
    ///
    /// The user must be located first; the geocoder is not called
    /// otherwise.
    ///
    /// # Errors
    /// Returns [`SessionError::Geocode`] when the address cannot be
    /// resolved, otherwise as [`Self::route_to`].
    pub async fn route_to_address(&self, address: &str) -> Result<RoutePlan, SessionError> {
        let id = self.begin_route();
        let located = self.with_state(|state| state.user_location.filter(is_valid_coordinate));
        if located.is_none() {
            let error = RouteError::MissingEndpoint {
                endpoint: Endpoint::Origin,
            };
            self.dispatch(SessionEvent::RouteRejected {
                id,
                error: error.clone(),
            });
            return Err(error.into());
        }

        let resolved = Geocoder
            .resolve_address(&self.geocoder, address, &self.config.region_bias)
            .await;
        let destination = match resolved {
            Ok(destination) => destination,
            Err(error) => {
                self.dispatch(SessionEvent::GeocodeFailed {
                    id,
                    error: error.clone(),
                });
                ensure_latest(&self.routes, id, Operation::Route)?;
                return Err(error.into());
            }
        };
        ensure_latest(&self.routes, id, Operation::Route)?;
        self.plan_route(id, destination, Some(address.trim().to_owned()))
            .await
    }

    /// Remove the drawn route and ignore any computation in flight.
    pub fn clear_route(&self) {
        self.routes.issue();
        self.dispatch(SessionEvent::RouteCleared);
    }

    /// Validate `form` and submit it to the store.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidPoint`] without contacting the store
    /// when validation fails, and [`SessionError::Service`] when the store
    /// rejects the point.
    pub async fn create_point(
        &self,
        form: &NewPointOfInterest,
    ) -> Result<PointOfInterest, SessionError> {
        if let Err(reason) = form.validate() {
            self.dispatch(SessionEvent::PointRejected(reason.clone()));
            return Err(reason.into());
        }
        match self.store.create_point(form).await {
            Ok(point) => {
                info!("created point {} ({})", point.id, point.name);
                self.dispatch(SessionEvent::PointCreated(point.clone()));
                Ok(point)
            }
            Err(error) => {
                self.dispatch(SessionEvent::CreateFailed(error.clone()));
                Err(error.into())
            }
        }
    }

    /// Dismiss the current status message.
    pub fn dismiss_status(&self) {
        self.dispatch(SessionEvent::StatusDismissed);
    }

    fn apply_loaded<T>(
        &self,
        outcome: Result<T, ServiceError>,
        loaded: fn(T) -> SessionEvent,
    ) -> Result<(), ServiceError> {
        match outcome {
            Ok(value) => {
                self.dispatch(loaded(value));
                Ok(())
            }
            Err(error) => {
                self.dispatch(SessionEvent::LoadFailed(error.clone()));
                Err(error)
            }
        }
    }

    fn begin_route(&self) -> RequestId {
        let id = self.routes.issue();
        self.dispatch(SessionEvent::RouteRequested { id });
        id
    }

    async fn plan_route(
        &self,
        id: RequestId,
        destination: Coordinate,
        label: Option<String>,
    ) -> Result<RoutePlan, SessionError> {
        let origin = self.with_state(|state| state.user_location);
        let checked = check_endpoints(origin, Some(destination)).map(|(origin, destination)| {
            let request = RouteRequest::new(origin, destination);
            match label {
                Some(label) => request.with_label(label),
                None => request,
            }
        });
        let request = match checked {
            Ok(request) => request,
            Err(error) => {
                self.dispatch(SessionEvent::RouteRejected {
                    id,
                    error: error.clone(),
                });
                return Err(error.into());
            }
        };

        self.dispatch(SessionEvent::RouteStarted {
            id,
            request: request.clone(),
        });
        match RoutePlanner.plan(&self.directions, &request).await {
            Ok(plan) => {
                self.dispatch(SessionEvent::RouteCompleted {
                    id,
                    plan: plan.clone(),
                });
                ensure_latest(&self.routes, id, Operation::Route)?;
                Ok(plan)
            }
            Err(error) => {
                self.dispatch(SessionEvent::RouteRejected {
                    id,
                    error: error.clone(),
                });
                Err(error.into())
            }
        }
    }
}

fn ensure_latest(
    sequencer: &RequestSequencer,
    id: RequestId,
    operation: Operation,
) -> Result<(), SessionError> {
    if sequencer.is_latest(id) {
        Ok(())
    } else {
        debug!("{operation} {id} was superseded");
        Err(SessionError::Superseded { operation })
    }
}
