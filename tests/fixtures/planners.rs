//! Scripted route planners.

use std::collections::HashMap;
use std::sync::Mutex;

use hos_trip_planner::polyline::Polyline;
use hos_trip_planner::traits::{Coordinates, PointOfInterest, Route, RouteError, RoutePlanner};

/// Planner with fixed per-leg results and call recording.
pub struct ScriptedPlanner {
    pub places: HashMap<String, Coordinates>,
    /// Distance and duration returned for every leg.
    pub leg_meters: f64,
    pub leg_seconds: f64,
    pub fail_route: bool,
    pub pois: Vec<PointOfInterest>,
    pub poi_paths: Mutex<Vec<Vec<Coordinates>>>,
    pub route_calls: Mutex<Vec<(Coordinates, Coordinates)>>,
}

impl ScriptedPlanner {
    pub fn new(places: &[(&str, Coordinates)]) -> Self {
        Self {
            places: places
                .iter()
                .map(|(name, coords)| (name.to_string(), *coords))
                .collect(),
            leg_meters: 0.0,
            leg_seconds: 0.0,
            fail_route: false,
            pois: Vec::new(),
            poi_paths: Mutex::new(Vec::new()),
            route_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn legs(mut self, meters: f64, seconds: f64) -> Self {
        self.leg_meters = meters;
        self.leg_seconds = seconds;
        self
    }

    pub fn failing_route(mut self) -> Self {
        self.fail_route = true;
        self
    }

    pub fn with_poi(mut self, label: &str, coordinates: Coordinates) -> Self {
        self.pois.push(PointOfInterest {
            label: label.to_string(),
            coordinates,
        });
        self
    }
}

impl RoutePlanner for ScriptedPlanner {
    fn geocode(&self, address: &str) -> Option<Coordinates> {
        self.places.get(address).copied()
    }

    fn route(&self, from: Coordinates, to: Coordinates) -> Result<Route, RouteError> {
        self.route_calls.lock().unwrap().push((from, to));
        if self.fail_route {
            return Err(RouteError::Status {
                status: 404,
                body: "Could not find routable point".to_string(),
            });
        }

        // A few intermediate points so path joins and sampling are visible.
        let mut path = vec![from];
        path.extend((1..4).map(|step| {
            let t = step as f64 / 4.0;
            Coordinates::new(from.lat + (to.lat - from.lat) * t, from.lng + (to.lng - from.lng) * t)
        }));
        path.push(to);

        Ok(Route {
            distance_meters: self.leg_meters,
            duration_seconds: self.leg_seconds,
            path: Polyline::new(path),
        })
    }

    fn points_of_interest(&self, path: &[Coordinates]) -> Vec<PointOfInterest> {
        self.poi_paths.lock().unwrap().push(path.to_vec());
        self.pois.clone()
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
