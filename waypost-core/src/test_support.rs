//! In-memory collaborators used by unit and behaviour tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;

use crate::{
    Coordinate, Directions, DirectionsProvider, GeocodeCandidate, GeocodingService,
    NewPointOfInterest, PoiStore, PointOfInterest, ServiceError, haversine_km,
};

/// Arguments of a [`PoiStore::search_nearby`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Search centre.
    pub center: Coordinate,
    /// Radius in metres.
    pub radius_meters: u32,
    /// Category filter.
    pub category: Option<String>,
}

/// In-memory `PoiStore` answering proximity queries by linear scan.
#[derive(Debug, Default)]
pub struct MemoryStore {
    points: RefCell<Vec<PointOfInterest>>,
    categories: Vec<String>,
    failure: RefCell<Option<ServiceError>>,
    queries: RefCell<Vec<NearbyQuery>>,
}

impl MemoryStore {
    /// Create a store holding `points`; categories are the distinct point
    /// categories in first-seen order.
    pub fn with_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        let points: Vec<PointOfInterest> = points.into_iter().collect();
        let mut categories: Vec<String> = Vec::new();
        for poi in &points {
            if !categories.contains(&poi.category) {
                categories.push(poi.category.clone());
            }
        }
        Self {
            points: RefCell::new(points),
            categories,
            ..Self::default()
        }
    }

    /// Replace the category list.
    #[must_use]
    pub fn with_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Make every following call fail with `error`, or succeed again with
    /// `None`.
    pub fn fail_with(&self, error: Option<ServiceError>) {
        *self.failure.borrow_mut() = error;
    }

    /// Proximity queries received so far.
    pub fn queries(&self) -> Vec<NearbyQuery> {
        self.queries.borrow().clone()
    }

    fn check(&self) -> Result<(), ServiceError> {
        self.failure.borrow().clone().map_or(Ok(()), Err)
    }
}

#[async_trait(?Send)]
impl PoiStore for MemoryStore {
    async fn list_points(&self) -> Result<Vec<PointOfInterest>, ServiceError> {
        self.check()?;
        Ok(self.points.borrow().clone())
    }

    async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        self.check()?;
        Ok(self.categories.clone())
    }

    async fn create_point(
        &self,
        point: &NewPointOfInterest,
    ) -> Result<PointOfInterest, ServiceError> {
        self.check()?;
        let location = point.location.ok_or_else(|| ServiceError::Service {
            code: "400".into(),
            message: "location is required".into(),
        })?;
        let mut points = self.points.borrow_mut();
        let id = points.iter().map(|poi| poi.id).max().unwrap_or(0) + 1;
        let created = PointOfInterest {
            id,
            name: point.name.trim().to_owned(),
            description: point.description.clone(),
            category: point.category.clone(),
            address: point.address.clone(),
            phone: point.phone.clone(),
            email: point.email.clone(),
            website: point.website.clone(),
            location,
        };
        points.push(created.clone());
        Ok(created)
    }

    async fn search_nearby(
        &self,
        center: Coordinate,
        radius_meters: u32,
        category: Option<&str>,
    ) -> Result<Vec<PointOfInterest>, ServiceError> {
        self.queries.borrow_mut().push(NearbyQuery {
            center,
            radius_meters,
            category: category.map(str::to_owned),
        });
        self.check()?;
        let radius_km = f64::from(radius_meters) / 1000.0;
        Ok(self
            .points
            .borrow()
            .iter()
            .filter(|poi| category.is_none_or(|name| poi.category == name))
            .filter(|poi| haversine_km(&center, &poi.location) <= radius_km)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone)]
enum DirectionsReply {
    Fixed(Directions),
    Direct {
        duration_seconds: f64,
        distance_meters: f64,
    },
    Fail(ServiceError),
}

/// Scripted `DirectionsProvider` that counts its calls.
#[derive(Debug)]
pub struct StubDirections {
    reply: DirectionsReply,
    calls: Cell<usize>,
}

impl StubDirections {
    /// Answer every request with `directions`.
    pub const fn with_directions(directions: Directions) -> Self {
        Self {
            reply: DirectionsReply::Fixed(directions),
            calls: Cell::new(0),
        }
    }

    /// Answer with a two-point path between the requested endpoints.
    pub const fn direct(duration_seconds: f64, distance_meters: f64) -> Self {
        Self {
            reply: DirectionsReply::Direct {
                duration_seconds,
                distance_meters,
            },
            calls: Cell::new(0),
        }
    }

    /// Fail every request with `error`.
    pub const fn with_error(error: ServiceError) -> Self {
        Self {
            reply: DirectionsReply::Fail(error),
            calls: Cell::new(0),
        }
    }

    /// Fail every request with a network error.
    pub fn unavailable() -> Self {
        Self::with_error(ServiceError::Network {
            url: "http://directions.invalid".into(),
            message: "connection refused".into(),
        })
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl DirectionsProvider for StubDirections {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Directions, ServiceError> {
        self.calls.set(self.calls.get() + 1);
        match &self.reply {
            DirectionsReply::Fixed(directions) => Ok(directions.clone()),
            DirectionsReply::Direct {
                duration_seconds,
                distance_meters,
            } => Ok(Directions {
                path: vec![origin, destination],
                duration_seconds: *duration_seconds,
                distance_meters: *distance_meters,
            }),
            DirectionsReply::Fail(error) => Err(error.clone()),
        }
    }
}

/// Scripted `GeocodingService` that records the queries it receives.
///
/// The default instance matches nothing.
#[derive(Debug)]
pub struct StubGeocoder {
    reply: Result<Vec<GeocodeCandidate>, ServiceError>,
    queries: RefCell<Vec<String>>,
}

impl Default for StubGeocoder {
    fn default() -> Self {
        Self::with_candidates(Vec::new())
    }
}

impl StubGeocoder {
    /// Answer every query with `candidates`.
    pub fn with_candidates(candidates: Vec<GeocodeCandidate>) -> Self {
        Self {
            reply: Ok(candidates),
            queries: RefCell::default(),
        }
    }

    /// Answer every query with a single match at `coordinate`.
    pub fn with_match(coordinate: Coordinate) -> Self {
        Self::with_candidates(vec![GeocodeCandidate {
            coordinate,
            display_name: None,
        }])
    }

    /// Fail every query with `error`.
    pub fn with_error(error: ServiceError) -> Self {
        Self {
            reply: Err(error),
            queries: RefCell::default(),
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

#[async_trait(?Send)]
impl GeocodingService for StubGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, ServiceError> {
        self.queries.borrow_mut().push(query.to_owned());
        self.reply.clone()
    }
}
