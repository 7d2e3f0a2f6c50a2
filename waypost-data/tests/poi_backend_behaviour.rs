//! Behavioural tests for [`HttpPoiStore`] against a local one-shot server.

mod support;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;
use support::OneShotServer;
use waypost_core::{Coordinate, PoiStore, PointOfInterest, ServiceError};
use waypost_data::backend::{HttpPoiStore, PoiStoreConfig};

const TWO_POINTS: &str = r#"[
    {"id": 1, "nombre": "Parque Calderón", "categoria": "Parque",
     "direccion": "Simón Bolívar y Benigno Malo", "latitud": -2.8975, "longitud": -79.0045},
    {"id": 2, "nombre": "Parque de la Madre", "categoria": "Parque",
     "latitud": -2.9070, "longitud": -79.0010}
]"#;

#[derive(Default)]
struct BackendWorld {
    server: RefCell<Option<OneShotServer>>,
    outcome: RefCell<Option<Result<Vec<PointOfInterest>, ServiceError>>>,
    request: RefCell<String>,
}

impl BackendWorld {
    fn serve(&self, server: OneShotServer) {
        self.server.replace(Some(server));
    }

    fn run<F, Fut>(&self, call: F)
    where
        F: FnOnce(HttpPoiStore) -> Fut,
        Fut: Future<Output = Result<Vec<PointOfInterest>, ServiceError>>,
    {
        let server = self
            .server
            .borrow_mut()
            .take()
            .expect("server must be configured");
        let store = HttpPoiStore::with_config(
            PoiStoreConfig::new(server.url("/api")).with_timeout(Duration::from_millis(300)),
        )
        .expect("store should build");
        let outcome = block_on(call(store));
        self.outcome.replace(Some(outcome));
        self.request.replace(server.request());
    }

    fn outcome(&self) -> std::cell::Ref<'_, Result<Vec<PointOfInterest>, ServiceError>> {
        std::cell::Ref::map(self.outcome.borrow(), |outcome| {
            outcome.as_ref().expect("a request must have been made")
        })
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

#[fixture]
fn world() -> BackendWorld {
    BackendWorld::default()
}

#[given("a backend serving two points")]
fn backend_serving_points(world: &BackendWorld) {
    world.serve(OneShotServer::respond(200, TWO_POINTS));
}

#[given("a backend answering with an internal error")]
fn backend_failing(world: &BackendWorld) {
    world.serve(OneShotServer::respond(500, r#"{"error": "database down"}"#));
}

#[given("a backend answering with malformed JSON")]
fn backend_malformed(world: &BackendWorld) {
    world.serve(OneShotServer::respond(200, r#"[{"id": 1, "nombre": "#));
}

#[given("a backend that never answers")]
fn backend_silent(world: &BackendWorld) {
    world.serve(OneShotServer::stall(Duration::from_secs(1)));
}

#[when("the points are listed")]
fn list_points(world: &BackendWorld) {
    world.run(|store| async move { store.list_points().await });
}

#[when("parks within two kilometres are searched")]
fn search_parks(world: &BackendWorld) {
    world.run(|store| async move {
        store
            .search_nearby(Coordinate::new(-2.899, -78.968), 2_000, Some("Parque"))
            .await
    });
}

#[then("two points are returned")]
fn two_points(world: &BackendWorld) {
    let outcome = world.outcome();
    let points = outcome.as_ref().expect("expected points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].name, "Parque Calderón");
    assert_eq!(
        points[0].address.as_deref(),
        Some("Simón Bolívar y Benigno Malo")
    );
    assert_eq!(points[1].location, Coordinate::new(-2.9070, -79.0010));
}

#[then("the request asked for every point")]
fn requested_points(world: &BackendWorld) {
    let request = world.request.borrow();
    assert!(
        request.starts_with("GET /api/puntos HTTP/1.1"),
        "unexpected request: {request}"
    );
}

#[then("the request carried the proximity query")]
fn requested_proximity(world: &BackendWorld) {
    let request = world.request.borrow();
    assert!(
        request.starts_with(
            "GET /api/puntos/cercanos?lat=-2.899&lng=-78.968&radio=2000&categoria=Parque HTTP/1.1"
        ),
        "unexpected request: {request}"
    );
}

#[then("an HTTP 500 error is returned")]
fn http_error(world: &BackendWorld) {
    let outcome = world.outcome();
    assert!(
        matches!(&*outcome, Err(ServiceError::Http { status: 500, .. })),
        "expected HTTP 500, got {outcome:?}"
    );
}

#[then("a parse error is returned")]
fn parse_error(world: &BackendWorld) {
    let outcome = world.outcome();
    assert!(
        matches!(&*outcome, Err(ServiceError::Parse { .. })),
        "expected parse error, got {outcome:?}"
    );
}

#[then("a timeout error is returned")]
fn timeout_error(world: &BackendWorld) {
    let outcome = world.outcome();
    assert!(
        matches!(&*outcome, Err(ServiceError::Timeout { .. })),
        "expected timeout, got {outcome:?}"
    );
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/poi_backend.feature", name = $title)]
        fn $fn_name(world: BackendWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    listing_points_decodes_records,
    "listing points decodes backend records"
);
register_scenario!(
    proximity_search_sends_query,
    "a proximity search sends the query parameters"
);
register_scenario!(
    failing_backend_reports_status,
    "a failing backend reports the HTTP status"
);
register_scenario!(
    malformed_body_is_parse_error,
    "a malformed body is reported as a parse error"
);
register_scenario!(silent_backend_times_out, "a silent backend times out");
