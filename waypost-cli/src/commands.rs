//! Subcommand arguments and their execution against a [`MapSession`].

use std::io::Write;

use clap::{ArgGroup, Args};
use log::info;
use serde::Serialize;
use waypost_core::{
    CategoryMarker, Coordinate, DirectionsProvider, Geocoder, GeocodingService,
    LocationProvider, MapSession, NewPointOfInterest, PoiStore, RoutePlan, RouteRequest,
    StatusSignal, VisibleSet,
};

use crate::CliError;

pub(crate) const ARG_AT: &str = "at";
pub(crate) const ARG_TO: &str = "to";

/// Arguments for `points`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct PointsArgs {
    /// Only show points in this category.
    #[arg(long, value_name = "name")]
    pub(crate) category: Option<String>,
    /// Case-insensitive text matched against name and description.
    #[arg(long, value_name = "text")]
    pub(crate) query: Option<String>,
}

/// Arguments for `nearby`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct NearbyArgs {
    /// Search centre as `latitude,longitude`; defaults to the user's
    /// position.
    #[arg(long = ARG_AT, value_name = "lat,lon", allow_hyphen_values = true)]
    pub(crate) at: Option<String>,
    /// Search radius in metres, clamped into the configured bounds.
    #[arg(long, value_name = "metres")]
    pub(crate) radius: Option<u32>,
    #[command(flatten)]
    pub(crate) filters: PointsArgs,
}

/// Arguments for `route`. Exactly one destination must be given.
#[derive(Debug, Clone, Default, Args)]
#[command(group(
    ArgGroup::new("destination")
        .required(true)
        .args(["address", "poi", "to"])
))]
pub(crate) struct RouteArgs {
    /// Destination address, resolved inside the configured region.
    #[arg(long, value_name = "text")]
    pub(crate) address: Option<String>,
    /// Destination point id.
    #[arg(long, value_name = "id")]
    pub(crate) poi: Option<u64>,
    /// Destination as `latitude,longitude`.
    #[arg(long = ARG_TO, value_name = "lat,lon", allow_hyphen_values = true)]
    pub(crate) to: Option<String>,
}

/// Arguments for `geocode`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct GeocodeArgs {
    /// Address to resolve.
    #[arg(value_name = "address")]
    pub(crate) address: String,
}

/// Arguments for `create`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct CreateArgs {
    /// Display name.
    #[arg(long)]
    pub(crate) name: String,
    /// Category name.
    #[arg(long)]
    pub(crate) category: String,
    /// Position as `latitude,longitude`.
    #[arg(long = ARG_AT, value_name = "lat,lon", allow_hyphen_values = true)]
    pub(crate) at: Option<String>,
    /// Free-form description.
    #[arg(long)]
    pub(crate) description: Option<String>,
    /// Postal address.
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Contact phone.
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Contact e-mail.
    #[arg(long)]
    pub(crate) email: Option<String>,
    /// Website URL.
    #[arg(long)]
    pub(crate) website: Option<String>,
}

/// Subcommands of the `waypost` binary.
#[derive(Debug, Clone, clap::Subcommand)]
pub(crate) enum Command {
    /// List points passing the category and text filters.
    Points(PointsArgs),
    /// List categories with their map markers.
    Categories,
    /// Search for points around a position.
    Nearby(NearbyArgs),
    /// Plan a route from the user's position.
    Route(RouteArgs),
    /// Resolve an address to a coordinate.
    Geocode(GeocodeArgs),
    /// Create a point of interest.
    Create(CreateArgs),
}

/// Parse `latitude,longitude`.
///
/// Range checks are left to the session, which reports them in its own
/// terms.
pub(crate) fn parse_coordinate(field: &'static str, value: &str) -> Result<Coordinate, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        field,
        value: value.to_owned(),
    };
    let (latitude, longitude) = value.split_once(',').ok_or_else(invalid)?;
    let latitude = latitude.trim().parse::<f64>().map_err(|_| invalid())?;
    let longitude = longitude.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok(Coordinate::new(latitude, longitude))
}

#[derive(Debug, Serialize)]
struct CategoryEntry<'a> {
    name: &'a str,
    marker: CategoryMarker,
    glyph: &'static str,
}

#[derive(Debug, Serialize)]
struct NearbyReport<'a> {
    center: Coordinate,
    radius_meters: u32,
    #[serde(flatten)]
    visible: VisibleSet<'a>,
}

#[derive(Debug, Serialize)]
struct RouteReport<'a> {
    request: Option<&'a RouteRequest>,
    #[serde(flatten)]
    plan: &'a RoutePlan,
    notice: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeocodeReport<'a> {
    query: String,
    coordinate: Coordinate,
    region_bias: &'a str,
}

/// Run `command` against `session` and return its JSON report.
pub(crate) async fn execute<S, D, G, L>(
    session: &MapSession<S, D, G, L>,
    command: Command,
) -> Result<serde_json::Value, CliError>
where
    S: PoiStore,
    D: DirectionsProvider,
    G: GeocodingService,
    L: LocationProvider,
{
    match command {
        Command::Points(args) => {
            session.load().await?;
            apply_filters(session, args);
            session.with_state(|state| to_json(&state.visible()))
        }
        Command::Categories => {
            session.load().await?;
            session.with_state(|state| {
                let entries: Vec<CategoryEntry<'_>> = state
                    .categories
                    .iter()
                    .map(|name| {
                        let marker = CategoryMarker::for_category(name);
                        CategoryEntry {
                            name,
                            marker,
                            glyph: marker.glyph(),
                        }
                    })
                    .collect();
                to_json(&entries)
            })
        }
        Command::Nearby(args) => {
            if let Some(radius) = args.radius {
                session.set_radius(radius);
            }
            apply_filters(session, args.filters);
            let results = match args.at.as_deref() {
                Some(at) => session.search_at(parse_coordinate(ARG_AT, at)?).await?,
                None => session.search_near_user().await?,
            };
            info!(
                "{} points within {} m of {}",
                results.points.len(),
                results.radius_meters,
                results.center
            );
            session.with_state(|state| {
                to_json(&NearbyReport {
                    center: results.center,
                    radius_meters: results.radius_meters,
                    visible: state.visible(),
                })
            })
        }
        Command::Route(args) => {
            session.locate_user().await?;
            let plan = if let Some(address) = args.address.as_deref() {
                session.route_to_address(address).await?
            } else if let Some(id) = args.poi {
                session.load().await?;
                session.route_to_point(id).await?
            } else {
                let to = args.to.as_deref().unwrap_or_default();
                session.route_to(parse_coordinate(ARG_TO, to)?, None).await?
            };
            session.with_state(|state| {
                to_json(&RouteReport {
                    request: state.route.request.as_ref(),
                    plan: &plan,
                    notice: match &state.status {
                        Some(status @ StatusSignal::RouteDegraded(_)) => Some(status.to_string()),
                        _ => None,
                    },
                })
            })
        }
        Command::Geocode(args) => {
            let region_bias = session.config().region_bias.as_str();
            let coordinate = Geocoder
                .resolve_address(session.geocoder(), &args.address, region_bias)
                .await?;
            to_json(&GeocodeReport {
                query: Geocoder::biased_query(&args.address, region_bias),
                coordinate,
                region_bias,
            })
        }
        Command::Create(args) => {
            let location = args
                .at
                .as_deref()
                .map(|at| parse_coordinate(ARG_AT, at))
                .transpose()?;
            let form = NewPointOfInterest {
                name: args.name,
                description: args.description,
                category: args.category,
                address: args.address,
                phone: args.phone,
                email: args.email,
                website: args.website,
                location,
            };
            let created = session.create_point(&form).await?;
            to_json(&created)
        }
    }
}

fn apply_filters<S, D, G, L>(session: &MapSession<S, D, G, L>, filters: PointsArgs)
where
    S: PoiStore,
    D: DirectionsProvider,
    G: GeocodingService,
    L: LocationProvider,
{
    session.set_category(filters.category);
    if let Some(query) = filters.query {
        session.set_text_query(query);
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, CliError> {
    serde_json::to_value(value).map_err(CliError::SerialiseOutput)
}

/// Write `report` as pretty JSON followed by a newline.
pub(crate) fn write_report(
    writer: &mut dyn Write,
    report: &serde_json::Value,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
