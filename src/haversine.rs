//! Offline route planner (fallback when no mapping service is configured).
//!
//! Resolves addresses from a registered gazetteer and estimates routes from
//! great-circle distance. Less accurate than a real router (ignores roads)
//! but always available, which makes it the planner used in tests.

use std::collections::HashMap;

use crate::polyline::Polyline;
use crate::traits::{Coordinates, PointOfInterest, Route, RouteError, RoutePlanner};

/// Average highway speed assumption for a loaded truck.
const DEFAULT_SPEED_KMH: f64 = 80.0;

/// Straight-line to road distance factor.
const DEFAULT_ROAD_COEFFICIENT: f64 = 1.3;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine-based route planner.
#[derive(Debug, Clone)]
pub struct HaversinePlanner {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    /// Multiplier from great-circle to road distance.
    pub road_coefficient: f64,
    places: HashMap<String, Coordinates>,
}

impl Default for HaversinePlanner {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            road_coefficient: DEFAULT_ROAD_COEFFICIENT,
            places: HashMap::new(),
        }
    }
}

impl HaversinePlanner {
    pub fn new(speed_kmh: f64, road_coefficient: f64) -> Self {
        Self {
            speed_kmh,
            road_coefficient,
            places: HashMap::new(),
        }
    }

    /// Registers a place name for geocoding. Lookups ignore case and
    /// surrounding whitespace.
    pub fn with_place(mut self, name: &str, coordinates: Coordinates) -> Self {
        self.places.insert(place_key(name), coordinates);
        self
    }

    /// Calculate haversine distance between two points in kilometers.
    pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lng - from.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert road distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> f64 {
        km / self.speed_kmh * 3600.0
    }
}

impl RoutePlanner for HaversinePlanner {
    fn geocode(&self, address: &str) -> Option<Coordinates> {
        self.places.get(&place_key(address)).copied()
    }

    fn route(&self, from: Coordinates, to: Coordinates) -> Result<Route, RouteError> {
        let road_km = Self::haversine_km(from, to) * self.road_coefficient;
        Ok(Route {
            distance_meters: road_km * 1000.0,
            duration_seconds: self.km_to_seconds(road_km),
            path: Polyline::new(vec![from, to]),
        })
    }

    fn points_of_interest(&self, _path: &[Coordinates]) -> Vec<PointOfInterest> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "haversine"
    }
}

fn place_key(name: &str) -> String {
    name.trim().to_lowercase()
}
