//! Collaborator interfaces for trip planning.
//!
//! The simulator never touches these; the trip service uses them to turn
//! free-text locations into a routed trip. Implementations are blocking.

use serde::{Deserialize, Serialize};

use crate::polyline::Polyline;

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// GeoJSON ordering: `[lng, lat]`.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lng: pair[0],
        }
    }
}

/// A driving route between two or more points.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub path: Polyline,
}

impl Route {
    /// Appends a following leg, summing distance and duration.
    ///
    /// The first point of `next` is dropped when it repeats our last point.
    pub fn extend(&mut self, next: Route) {
        self.distance_meters += next.distance_meters;
        self.duration_seconds += next.duration_seconds;
        self.path.append(next.path);
    }
}

/// A named stop near the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub label: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("routing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("routing service returned no route")]
    NoRoute,
}

/// Geocoding, routing and POI lookup backed by a mapping service.
pub trait RoutePlanner: Send + Sync {
    /// Resolves free text to the single best match.
    ///
    /// Returns None when nothing matches or the upstream call fails.
    fn geocode(&self, address: &str) -> Option<Coordinates>;

    /// Fetches a driving route between two points.
    fn route(&self, from: Coordinates, to: Coordinates) -> Result<Route, RouteError>;

    /// Best-effort lookup of stops along `path`; empty on upstream failure.
    fn points_of_interest(&self, path: &[Coordinates]) -> Vec<PointOfInterest>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

impl<T: RoutePlanner + ?Sized> RoutePlanner for Box<T> {
    fn geocode(&self, address: &str) -> Option<Coordinates> {
        (**self).geocode(address)
    }

    fn route(&self, from: Coordinates, to: Coordinates) -> Result<Route, RouteError> {
        (**self).route(from, to)
    }

    fn points_of_interest(&self, path: &[Coordinates]) -> Vec<PointOfInterest> {
        (**self).points_of_interest(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
