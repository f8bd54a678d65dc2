//! Real US freight hubs for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap city centroids.

use hos_trip_planner::haversine::HaversinePlanner;
use hos_trip_planner::traits::Coordinates;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

pub const CHICAGO: Location = Location::new("Chicago, IL", 41.8781136, -87.6297982);
pub const INDIANAPOLIS: Location = Location::new("Indianapolis, IN", 39.7684030, -86.1580680);
pub const NASHVILLE: Location = Location::new("Nashville, TN", 36.1626638, -86.7816016);
pub const DALLAS: Location = Location::new("Dallas, TX", 32.7766642, -96.7969879);
pub const LOS_ANGELES: Location = Location::new("Los Angeles, CA", 34.0522342, -118.2436849);
pub const NEW_YORK: Location = Location::new("New York, NY", 40.7127753, -74.0059728);

pub const FREIGHT_HUBS: &[Location] = &[CHICAGO, INDIANAPOLIS, NASHVILLE, DALLAS, LOS_ANGELES, NEW_YORK];

/// Offline planner that knows every freight hub by name.
pub fn freight_planner() -> HaversinePlanner {
    FREIGHT_HUBS
        .iter()
        .fold(HaversinePlanner::default(), |planner, hub| planner.with_place(hub.name, hub.coords()))
}
