//! Session state snapshots and the reducer that advances them.
//!
//! Completions carry the [`RequestId`] they were issued with. A completion
//! whose id no longer matches the pending one has been superseded and
//! leaves the state untouched.

use log::debug;

use crate::{
    Coordinate, GeocodeError, LocationError, NearbyResults, PointOfInterest,
    PointOfInterestError, RadiusBounds, RequestId, RouteError, RoutePlan, RouteRequest,
    SearchError, SearchState, ServiceError, VisibleSet, compute_visible_set,
};

use super::StatusSignal;

/// Route shown on the map, and the computation that will replace it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteView {
    /// Request of the latest route computation.
    pub request: Option<RouteRequest>,
    /// Completed plan to draw.
    pub plan: Option<RoutePlan>,
    pending: Option<RequestId>,
}

impl RouteView {
    /// Identifier of the computation still in flight.
    #[must_use]
    pub const fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    /// Whether a computation is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Immutable snapshot of everything a map view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Every point known to the session.
    pub points: Vec<PointOfInterest>,
    /// Category names offered by the store.
    pub categories: Vec<String>,
    /// Filter inputs.
    pub search: SearchState,
    /// Points returned by the last applied proximity search.
    pub search_results: Vec<PointOfInterest>,
    /// Last known user position.
    pub user_location: Option<Coordinate>,
    /// Route display.
    pub route: RouteView,
    /// Latest status to show the user.
    pub status: Option<StatusSignal>,
    radius_bounds: RadiusBounds,
    pending_search: Option<RequestId>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(RadiusBounds::default())
    }
}

impl SessionState {
    /// Empty state whose radius changes are clamped into `radius_bounds`.
    #[must_use]
    pub fn new(radius_bounds: RadiusBounds) -> Self {
        let mut search = SearchState::default();
        search.radius_meters = radius_bounds.clamp(search.radius_meters);
        Self {
            points: Vec::new(),
            categories: Vec::new(),
            search,
            search_results: Vec::new(),
            user_location: None,
            route: RouteView::default(),
            status: None,
            radius_bounds,
            pending_search: None,
        }
    }

    /// Bounds applied to the search radius.
    #[must_use]
    pub const fn radius_bounds(&self) -> RadiusBounds {
        self.radius_bounds
    }

    /// Whether a proximity search is in flight.
    #[must_use]
    pub const fn search_pending(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Points passing the current filters.
    #[must_use]
    pub fn visible(&self) -> VisibleSet<'_> {
        compute_visible_set(&self.points, &self.search_results, &self.search)
    }

    /// Look up a point by id among all points and search results.
    #[must_use]
    pub fn find_point(&self, id: u64) -> Option<&PointOfInterest> {
        self.points
            .iter()
            .chain(&self.search_results)
            .find(|poi| poi.id == id)
    }
}

/// Inputs that advance a [`SessionState`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The store returned the full point list.
    PointsLoaded(Vec<PointOfInterest>),
    /// The store returned the category names.
    CategoriesLoaded(Vec<String>),
    /// Points or categories could not be loaded.
    LoadFailed(ServiceError),
    /// The user picked a category filter, or cleared it with `None`.
    CategorySelected(Option<String>),
    /// The user edited the free-text filter.
    TextQueryChanged(String),
    /// The user moved the radius control.
    RadiusChanged(u32),
    /// A proximity search was issued.
    SearchStarted {
        /// Search identifier.
        id: RequestId,
    },
    /// A proximity search returned results.
    SearchSucceeded {
        /// Search identifier.
        id: RequestId,
        /// Validated query and returned points.
        results: NearbyResults,
    },
    /// A proximity search failed.
    SearchFailed {
        /// Search identifier.
        id: RequestId,
        /// Failure reason.
        error: SearchError,
    },
    /// The user left proximity mode.
    SearchCleared,
    /// The user's position was determined.
    UserLocated(Coordinate),
    /// The user's position could not be determined.
    LocationFailed(LocationError),
    /// A route computation was issued. The previous route is removed.
    RouteRequested {
        /// Route identifier.
        id: RequestId,
    },
    /// Endpoints were resolved and directions were requested.
    RouteStarted {
        /// Route identifier.
        id: RequestId,
        /// Resolved endpoints.
        request: RouteRequest,
    },
    /// A route plan is ready, possibly degraded.
    RouteCompleted {
        /// Route identifier.
        id: RequestId,
        /// Plan to draw.
        plan: RoutePlan,
    },
    /// A route computation was rejected before any request.
    RouteRejected {
        /// Route identifier.
        id: RequestId,
        /// Rejection reason.
        error: RouteError,
    },
    /// The destination address of a route could not be resolved.
    GeocodeFailed {
        /// Route identifier.
        id: RequestId,
        /// Geocoding failure.
        error: GeocodeError,
    },
    /// The user removed the route.
    RouteCleared,
    /// The store created a point.
    PointCreated(PointOfInterest),
    /// The create-point form failed validation.
    PointRejected(PointOfInterestError),
    /// The store refused to create a point.
    CreateFailed(ServiceError),
    /// The user dismissed the status message.
    StatusDismissed,
}

/// Apply `event` to `state`, returning the next snapshot.
///
/// # Examples
/// ```
/// use waypost_core::{SessionEvent, SessionState, reduce};
///
/// let state = reduce(&SessionState::default(), SessionEvent::RadiusChanged(50_000));
/// assert_eq!(state.search.radius_meters, 10_000);
/// ```
#[must_use]
pub fn reduce(state: &SessionState, event: SessionEvent) -> SessionState {
    let mut next = state.clone();
    apply(&mut next, event);
    next
}

fn apply(state: &mut SessionState, event: SessionEvent) {
    match event {
        SessionEvent::PointsLoaded(points) => state.points = points,
        SessionEvent::CategoriesLoaded(categories) => state.categories = categories,
        SessionEvent::LoadFailed(error) => {
            state.status = Some(StatusSignal::load_failed(&error));
        }
        SessionEvent::CategorySelected(category) => {
            state.search.category = category.filter(|name| !name.trim().is_empty());
        }
        SessionEvent::TextQueryChanged(query) => state.search.text_query = query,
        SessionEvent::RadiusChanged(radius) => {
            state.search.radius_meters = state.radius_bounds.clamp(radius);
        }
        SessionEvent::SearchStarted { id } => state.pending_search = Some(id),
        SessionEvent::SearchSucceeded { id, results } => {
            if take_pending(&mut state.pending_search, id, "search") {
                state.search.center = Some(results.center);
                state.search.radius_meters = results.radius_meters;
                state.search_results = results.points;
                state.status = None;
            }
        }
        SessionEvent::SearchFailed { id, error } => {
            if take_pending(&mut state.pending_search, id, "search") {
                state.status = Some(StatusSignal::from(&error));
            }
        }
        SessionEvent::SearchCleared => {
            state.search.center = None;
            state.search_results.clear();
            state.pending_search = None;
        }
        SessionEvent::UserLocated(position) => state.user_location = Some(position),
        SessionEvent::LocationFailed(error) => {
            state.status = Some(StatusSignal::from(&error));
        }
        SessionEvent::RouteRequested { id } => {
            state.route = RouteView {
                request: None,
                plan: None,
                pending: Some(id),
            };
        }
        SessionEvent::RouteStarted { id, request } => {
            if state.route.pending == Some(id) {
                state.route.request = Some(request);
            } else {
                debug!("ignoring start of superseded route {id}");
            }
        }
        SessionEvent::RouteCompleted { id, plan } => {
            if take_pending(&mut state.route.pending, id, "route") {
                state.status = plan
                    .result
                    .degradation_reason()
                    .map(|reason| StatusSignal::RouteDegraded(reason.to_owned()));
                state.route.plan = Some(plan);
            }
        }
        SessionEvent::RouteRejected { id, error } => {
            if take_pending(&mut state.route.pending, id, "route") {
                state.status = Some(StatusSignal::from(&error));
            }
        }
        SessionEvent::GeocodeFailed { id, error } => {
            if take_pending(&mut state.route.pending, id, "route") {
                state.status = Some(StatusSignal::from(&error));
            }
        }
        SessionEvent::RouteCleared => state.route = RouteView::default(),
        SessionEvent::PointCreated(point) => {
            state.points.push(point);
            state.status = None;
        }
        SessionEvent::PointRejected(reason) => {
            state.status = Some(StatusSignal::InvalidPoint(reason));
        }
        SessionEvent::CreateFailed(error) => {
            state.status = Some(StatusSignal::create_failed(&error));
        }
        SessionEvent::StatusDismissed => state.status = None,
    }
}

/// Clear `pending` when it holds `id`, reporting whether it did.
fn take_pending(pending: &mut Option<RequestId>, id: RequestId, kind: &str) -> bool {
    if *pending == Some(id) {
        *pending = None;
        true
    } else {
        debug!("discarding superseded {kind} completion {id}");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RequestSequencer, RouteResult, ServiceError};
    use geo::LineString;
    use rstest::{fixture, rstest};

    fn poi(id: u64, category: &str) -> PointOfInterest {
        PointOfInterest::new(id, format!("Point {id}"), category, Coordinate::new(-2.9, -79.0))
    }

    fn plan(distance_km: f64) -> RoutePlan {
        RoutePlan {
            result: RouteResult::routed(5, distance_km),
            path: LineString::from(vec![(-79.0, -2.9), (-79.01, -2.91)]),
        }
    }

    #[fixture]
    fn loaded() -> SessionState {
        reduce(
            &SessionState::default(),
            SessionEvent::PointsLoaded(vec![poi(1, "Parque"), poi(2, "Banco")]),
        )
    }

    #[rstest]
    fn reduce_leaves_the_input_untouched(loaded: SessionState) {
        let before = loaded.clone();
        let _ = reduce(&loaded, SessionEvent::TextQueryChanged("park".into()));
        assert_eq!(loaded, before);
    }

    #[rstest]
    fn successful_search_switches_to_result_mode(loaded: SessionState) {
        let searches = RequestSequencer::default();
        let id = searches.issue();
        let centre = Coordinate::new(-2.9, -79.0);
        let state = reduce(&loaded, SessionEvent::SearchStarted { id });
        assert!(state.search_pending());

        let state = reduce(
            &state,
            SessionEvent::SearchSucceeded {
                id,
                results: NearbyResults {
                    center: centre,
                    radius_meters: 1_000,
                    points: vec![poi(2, "Banco")],
                },
            },
        );
        assert_eq!(state.search.center, Some(centre));
        assert_eq!(state.search.radius_meters, 1_000);
        let ids: Vec<u64> = state.visible().visible.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2]);
        assert!(!state.search_pending());
    }

    #[rstest]
    fn failed_search_keeps_previous_results(loaded: SessionState) {
        let searches = RequestSequencer::default();
        let first = searches.issue();
        let centre = Coordinate::new(-2.9, -79.0);
        let state = reduce(&loaded, SessionEvent::SearchStarted { id: first });
        let state = reduce(
            &state,
            SessionEvent::SearchSucceeded {
                id: first,
                results: NearbyResults {
                    center: centre,
                    radius_meters: 2_000,
                    points: vec![poi(1, "Parque")],
                },
            },
        );

        let second = searches.issue();
        let state = reduce(&state, SessionEvent::SearchStarted { id: second });
        let state = reduce(
            &state,
            SessionEvent::SearchFailed {
                id: second,
                error: SearchError::SearchFailed(ServiceError::parse("bad body")),
            },
        );
        assert_eq!(state.search.center, Some(centre));
        assert_eq!(state.search_results.len(), 1);
        assert!(matches!(state.status, Some(StatusSignal::SearchFailed(_))));
    }

    #[rstest]
    fn superseded_search_results_are_discarded(loaded: SessionState) {
        let searches = RequestSequencer::default();
        let stale = searches.issue();
        let latest = searches.issue();
        let state = reduce(&loaded, SessionEvent::SearchStarted { id: stale });
        let state = reduce(&state, SessionEvent::SearchStarted { id: latest });
        let state = reduce(
            &state,
            SessionEvent::SearchSucceeded {
                id: stale,
                results: NearbyResults {
                    center: Coordinate::new(0.0, 0.0),
                    radius_meters: 500,
                    points: Vec::new(),
                },
            },
        );
        assert_eq!(state.search.center, None);
        assert!(state.search_pending());
    }

    #[rstest]
    fn new_route_request_removes_the_drawn_route() {
        let routes = RequestSequencer::default();
        let first = routes.issue();
        let state = reduce(&SessionState::default(), SessionEvent::RouteRequested { id: first });
        let state = reduce(&state, SessionEvent::RouteCompleted { id: first, plan: plan(2.0) });
        assert!(state.route.plan.is_some());

        let second = routes.issue();
        let state = reduce(&state, SessionEvent::RouteRequested { id: second });
        assert_eq!(state.route.plan, None);
        assert_eq!(state.route.pending(), Some(second));
    }

    #[rstest]
    fn stale_route_completion_cannot_overwrite_newer_route() {
        let routes = RequestSequencer::default();
        let a = routes.issue();
        let b = routes.issue();
        let state = reduce(&SessionState::default(), SessionEvent::RouteRequested { id: a });
        let state = reduce(&state, SessionEvent::RouteRequested { id: b });
        let state = reduce(&state, SessionEvent::RouteCompleted { id: b, plan: plan(3.0) });
        let state = reduce(&state, SessionEvent::RouteCompleted { id: a, plan: plan(9.0) });
        let drawn = state.route.plan.expect("route b is drawn");
        assert!((drawn.result.distance_km() - 3.0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn clearing_the_route_discards_in_flight_results() {
        let routes = RequestSequencer::default();
        let id = routes.issue();
        let state = reduce(&SessionState::default(), SessionEvent::RouteRequested { id });
        let state = reduce(&state, SessionEvent::RouteCleared);
        let state = reduce(&state, SessionEvent::RouteCompleted { id, plan: plan(1.0) });
        assert_eq!(state.route, RouteView::default());
    }

    #[rstest]
    fn degraded_route_raises_a_notice() {
        let routes = RequestSequencer::default();
        let id = routes.issue();
        let degraded = RoutePlan {
            result: RouteResult::straight_line(1.2),
            path: LineString::from(vec![(-79.0, -2.9), (-79.01, -2.91)]),
        };
        let state = reduce(&SessionState::default(), SessionEvent::RouteRequested { id });
        let state = reduce(&state, SessionEvent::RouteCompleted { id, plan: degraded });
        assert!(matches!(state.status, Some(StatusSignal::RouteDegraded(_))));
    }

    #[rstest]
    #[case(Some("  ".to_owned()), None)]
    #[case(Some("Parque".to_owned()), Some("Parque"))]
    #[case(None, None)]
    fn blank_category_selection_clears_the_filter(
        loaded: SessionState,
        #[case] selected: Option<String>,
        #[case] expected: Option<&str>,
    ) {
        let state = reduce(&loaded, SessionEvent::CategorySelected(selected));
        assert_eq!(state.search.category.as_deref(), expected);
    }

    #[rstest]
    fn created_point_is_appended(loaded: SessionState) {
        let state = reduce(&loaded, SessionEvent::PointCreated(poi(3, "Escuela")));
        assert_eq!(state.points.len(), 3);
        assert_eq!(state.find_point(3).map(|p| p.category.as_str()), Some("Escuela"));
    }
}
