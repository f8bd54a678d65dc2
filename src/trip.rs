//! Trip planning: geocode, route, simulate the duty cycle, persist.

use chrono::{Local, NaiveDateTime};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::hos::{HosRules, SimulationError, SimulationResult, default_start_time, round2, simulate_with};
use crate::polyline::Polyline;
use crate::store::{LogSheet, NewTrip, StoreError, TripId, TripRecord, TripStore, daily_log_sheets};
use crate::traits::{Coordinates, PointOfInterest, RouteError, RoutePlanner};

/// Incoming trip request. Cycle hours are optional on the wire so a
/// missing value can be reported as a client error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    #[serde(default)]
    pub current_cycle_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_hours: f64,
    pub coordinates: Polyline,
    /// Current, pickup and dropoff locations first, then stops along the route.
    pub stops: Vec<PointOfInterest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub trip_id: TripId,
    pub route_summary: RouteSummary,
    pub logs: SimulationResult,
}

/// A stored trip with its daily log sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetails {
    #[serde(flatten)]
    pub trip: TripRecord,
    pub logs: Vec<LogSheet>,
}

#[derive(Debug, thiserror::Error)]
pub enum TripError {
    #[error("current_cycle_hours is required")]
    MissingCycleHours,
    #[error("current_cycle_hours must be a non-negative number, got {0}")]
    InvalidCycleHours(f64),
    #[error("{0} is required")]
    MissingLocation(&'static str),
    #[error("failed to geocode {field} '{address}'")]
    Geocode { field: &'static str, address: String },
    #[error("failed to get route data: {0}")]
    Route(#[from] RouteError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error("trip {0} not found")]
    NotFound(TripId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TripError {
    /// Whether the caller caused the failure (bad input or an unresolvable trip).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, TripError::Store(_))
    }
}

#[derive(Debug, Clone)]
pub struct TripOptions {
    pub rules: HosRules,
    /// Route points between samples sent to the POI lookup.
    pub poi_sample_step: usize,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            rules: HosRules::default(),
            poi_sample_step: 200,
        }
    }
}

pub struct TripService<P, S> {
    planner: P,
    store: S,
    options: TripOptions,
}

impl<P, S> TripService<P, S>
where
    P: RoutePlanner,
    S: TripStore,
{
    pub fn new(planner: P, store: S, options: TripOptions) -> Self {
        Self {
            planner,
            store,
            options,
        }
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Plans a trip starting at 06:00 today (local time).
    pub fn plan_trip(&self, request: &TripRequest) -> Result<TripPlan, TripError> {
        let now = Local::now().naive_local();
        self.plan_trip_at(request, default_start_time(now), now)
    }

    /// Plans a trip whose first driving block begins at `start_time`.
    pub fn plan_trip_at(
        &self,
        request: &TripRequest,
        start_time: NaiveDateTime,
        created_at: NaiveDateTime,
    ) -> Result<TripPlan, TripError> {
        let cycle_hours = validate_cycle_hours(request.current_cycle_hours)?;
        let addresses = [
            ("current_location", request.current_location.trim()),
            ("pickup_location", request.pickup_location.trim()),
            ("dropoff_location", request.dropoff_location.trim()),
        ];
        if let Some((field, _)) = addresses.iter().find(|(_, address)| address.is_empty()) {
            return Err(TripError::MissingLocation(*field));
        }

        let [current, pickup, dropoff] = self.geocode_all(&addresses)?;

        let mut route = self.planner.route(current, pickup)?;
        route.extend(self.planner.route(pickup, dropoff)?);

        let pois = self
            .planner
            .points_of_interest(&route.path.sample(self.options.poi_sample_step));
        debug!(count = pois.len(), "found stops along route");

        let mut stops = vec![
            stop("Current Location", current),
            stop("Pickup Location", pickup),
            stop("Dropoff Location", dropoff),
        ];
        stops.extend(pois);

        let distance_km = route.distance_meters / 1000.0;
        let duration_hours = route.duration_seconds / 3600.0;
        let logs = simulate_with(&self.options.rules, duration_hours, cycle_hours, start_time)?;

        let trip = self.store.insert_trip(
            NewTrip {
                current_location: request.current_location.clone(),
                pickup_location: request.pickup_location.clone(),
                dropoff_location: request.dropoff_location.clone(),
                current_cycle_hours: cycle_hours,
                created_at,
            },
            &|trip_id| daily_log_sheets(trip_id, &logs, distance_km, created_at),
        )?;

        info!(
            trip_id = trip.id,
            planner = self.planner.name(),
            distance_km = round2(distance_km),
            duration_hours = round2(duration_hours),
            days = logs.logs.len(),
            "planned trip"
        );

        Ok(TripPlan {
            trip_id: trip.id,
            route_summary: RouteSummary {
                distance_km: round2(distance_km),
                duration_hours: round2(duration_hours),
                coordinates: route.path,
                stops,
            },
            logs,
        })
    }

    /// Loads a stored trip with its log sheets.
    pub fn trip(&self, trip_id: TripId) -> Result<TripDetails, TripError> {
        let trip = self.store.trip(trip_id)?.ok_or(TripError::NotFound(trip_id))?;
        let logs = self.store.log_sheets(trip_id)?;
        Ok(TripDetails { trip, logs })
    }

    /// Geocodes all addresses in parallel, failing on the first one in
    /// request order that did not resolve.
    fn geocode_all(&self, addresses: &[(&'static str, &str); 3]) -> Result<[Coordinates; 3], TripError> {
        let planner = &self.planner;
        let resolved: Vec<Option<Coordinates>> = addresses
            .par_iter()
            .map(|(_, address)| planner.geocode(address))
            .collect();

        let mut coordinates = [Coordinates::new(0.0, 0.0); 3];
        for (slot, ((field, address), found)) in coordinates.iter_mut().zip(addresses.iter().zip(resolved)) {
            *slot = found.ok_or_else(|| TripError::Geocode {
                field: *field,
                address: address.to_string(),
            })?;
        }
        Ok(coordinates)
    }
}

fn validate_cycle_hours(value: Option<f64>) -> Result<f64, TripError> {
    match value {
        None => Err(TripError::MissingCycleHours),
        Some(hours) if hours.is_finite() && hours >= 0.0 => Ok(hours),
        Some(hours) => Err(TripError::InvalidCycleHours(hours)),
    }
}

fn stop(label: &str, coordinates: Coordinates) -> PointOfInterest {
    PointOfInterest {
        label: label.to_string(),
        coordinates,
    }
}
