//! Behaviour-driven step definitions driving the command scenarios against
//! in-memory collaborators.

use super::*;
use crate::commands::{CreateArgs, PointsArgs, RouteArgs};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::{Cell, RefCell};
use waypost_core::test_support::{MemoryStore, StubDirections, StubGeocoder};
use waypost_core::{
    Coordinate, FixedLocationProvider, LocationError, MapSession, PointOfInterest,
    PointOfInterestError, SessionConfig, SessionError,
};

const USER: Coordinate = Coordinate::new(-2.8990, -78.9680);

type Outcome = Result<serde_json::Value, CliError>;

/// Aggregates command scenario state behind a single world fixture.
#[derive(Default)]
struct CommandWorld {
    located: Cell<bool>,
    directions_down: Cell<bool>,
    outcome: RefCell<Option<Outcome>>,
}

impl CommandWorld {
    fn run(&self, command: Command) {
        let directions = if self.directions_down.get() {
            StubDirections::unavailable()
        } else {
            StubDirections::direct(600.0, 2_500.0)
        };
        let locator = if self.located.get() {
            FixedLocationProvider::new(USER)
        } else {
            FixedLocationProvider::unavailable()
        };
        let session = MapSession::new(
            cuenca_store(),
            directions,
            StubGeocoder::default(),
            locator,
            SessionConfig::default(),
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let outcome = runtime.block_on(execute(&session, command));
        self.outcome.replace(Some(outcome));
    }

    fn report(&self) -> serde_json::Value {
        let borrowed = self.outcome.borrow();
        borrowed
            .as_ref()
            .expect("command must have run")
            .as_ref()
            .expect("expected success")
            .clone()
    }

    fn session_error(&self) -> SessionError {
        let mut borrowed = self.outcome.borrow_mut();
        match borrowed.take().expect("command must have run") {
            Err(CliError::Session(error)) => error,
            other => panic!("expected a session error, found {other:?}"),
        }
    }
}

fn cuenca_store() -> MemoryStore {
    MemoryStore::with_points([
        PointOfInterest::new(
            1,
            "Parque Calderón",
            "Parque",
            Coordinate::new(-2.8975, -79.0045),
        ),
        PointOfInterest::new(
            2,
            "Hospital del Río",
            "Hospital",
            Coordinate::new(-2.8870, -78.9890),
        ),
        PointOfInterest::new(
            3,
            "Museo Pumapungo",
            "Museo",
            Coordinate::new(-2.9060, -78.9970),
        ),
    ])
}

fn route_to_park() -> Command {
    Command::Route(RouteArgs {
        to: Some("-2.8975,-79.0045".into()),
        ..RouteArgs::default()
    })
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::default()
}

#[given("the Cuenca backend")]
fn cuenca_backend(world: &CommandWorld) {
    assert!(world.outcome.borrow().is_none());
}

#[given("the user is located")]
fn user_located(world: &CommandWorld) {
    world.located.set(true);
}

#[given("directions are unavailable")]
fn directions_unavailable(world: &CommandWorld) {
    world.directions_down.set(true);
}

#[when("the points command runs for parks")]
fn points_for_parks(world: &CommandWorld) {
    world.run(Command::Points(PointsArgs {
        category: Some("Parque".into()),
        query: None,
    }));
}

#[when("the categories command runs")]
fn categories_command(world: &CommandWorld) {
    world.run(Command::Categories);
}

#[when("the route command runs to the park")]
fn route_command(world: &CommandWorld) {
    world.run(route_to_park());
}

#[when("the create command runs without a location")]
fn create_without_location(world: &CommandWorld) {
    world.run(Command::Create(CreateArgs {
        name: "Mirador de Turi".into(),
        category: "Parque".into(),
        ..CreateArgs::default()
    }));
}

#[then("only Parque Calderón is listed")]
fn only_park_listed(world: &CommandWorld) {
    let report = world.report();
    let names: Vec<&str> = report["visible"]
        .as_array()
        .expect("visible array")
        .iter()
        .filter_map(|poi| poi["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Parque Calderón"]);
    assert_eq!(report["category_counts"]["Parque"], 1);
}

#[then("the Museo category uses the generic marker")]
fn museo_generic(world: &CommandWorld) {
    let report = world.report();
    let entries = report.as_array().expect("category array");
    let museo = entries
        .iter()
        .find(|entry| entry["name"] == "Museo")
        .expect("Museo listed");
    assert_eq!(museo["marker"], "Generic");
    assert_eq!(museo["glyph"], "📍");
    let park = entries
        .iter()
        .find(|entry| entry["name"] == "Parque")
        .expect("Parque listed");
    assert_eq!(park["marker"], "Park");
}

#[then("the route takes 10 minutes over 2.5 km")]
fn routed_figures(world: &CommandWorld) {
    let report = world.report();
    assert_eq!(report["result"]["duration_minutes"], 10);
    assert_eq!(report["result"]["distance_km"], 2.5);
    assert_eq!(report["result"]["degraded"], false);
    assert!(report["notice"].is_null());
}

#[then("the route is a straight line with a notice")]
fn straight_line(world: &CommandWorld) {
    let report = world.report();
    assert_eq!(report["result"]["degraded"], true);
    assert!(report["result"]["duration_minutes"].is_null());
    assert!(report["notice"].is_string(), "expected a notice in {report}");
}

#[then("the command fails because the position is unknown")]
fn fails_without_position(world: &CommandWorld) {
    let error = world.session_error();
    assert!(
        matches!(error, SessionError::Location(LocationError::Unavailable(_))),
        "found {error:?}"
    );
}

#[then("the command fails because the location is missing")]
fn fails_without_location(world: &CommandWorld) {
    let error = world.session_error();
    assert_eq!(
        error,
        SessionError::InvalidPoint(PointOfInterestError::MissingLocation)
    );
}

macro_rules! register_command_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CommandWorld) {
            let _ = world;
        }
    };
}

register_command_scenario!(
    listing_points_by_category,
    "listing points filtered by category"
);
register_command_scenario!(
    listing_categories_with_markers,
    "listing categories marks unknown ones with a pin"
);
register_command_scenario!(
    routing_to_a_coordinate,
    "routing to a coordinate reports the travel time"
);
register_command_scenario!(
    routing_falls_back,
    "routing falls back to a straight line"
);
register_command_scenario!(routing_without_location, "routing without a location fails");
register_command_scenario!(
    creating_without_location,
    "creating a point without a location fails"
);
