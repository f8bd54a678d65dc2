//! Trip and log sheet records, and where they are kept.
//!
//! The planner only needs a small repository surface. `InMemoryTripStore`
//! is the implementation used by the CLI and in tests; a database-backed
//! store can implement the same trait.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::hos::{DutyKind, SimulationResult, round2};

pub type TripId = u64;

/// A validated trip request, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_cycle_hours: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: TripId,
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub current_cycle_hours: f64,
    pub created_at: NaiveDateTime,
}

/// Per-day totals of a trip's duty log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSheet {
    pub trip_id: TripId,
    /// 1-based day of the trip.
    pub day_number: u32,
    pub date: NaiveDate,
    pub driving_hours: f64,
    /// Sleeper-berth rest.
    pub rest_hours: f64,
    /// On-duty, not driving.
    pub idle_hours: f64,
    pub distance_km: f64,
    pub created_at: NaiveDateTime,
}

/// Summarizes a simulated log into one sheet per calendar day.
///
/// `distance_km` is apportioned by each day's share of the driving time.
/// Hours and distance are rounded to 2 decimals.
pub fn daily_log_sheets(
    trip_id: TripId,
    result: &SimulationResult,
    distance_km: f64,
    created_at: NaiveDateTime,
) -> Vec<LogSheet> {
    let total_driving = result.total_hours(DutyKind::Driving);

    result
        .logs
        .iter()
        .enumerate()
        .map(|(index, (date, log))| {
            let driving = log.total_hours(DutyKind::Driving);
            let distance = if total_driving > 0.0 {
                distance_km * driving / total_driving
            } else {
                0.0
            };

            LogSheet {
                trip_id,
                day_number: index as u32 + 1,
                date: *date,
                driving_hours: round2(driving),
                rest_hours: round2(log.total_hours(DutyKind::Sleeper)),
                idle_hours: round2(log.total_hours(DutyKind::OnDuty)),
                distance_km: round2(distance),
                created_at,
            }
        })
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("trip store lock poisoned")]
    Poisoned,
}

/// Persistence of trips and their log sheets.
pub trait TripStore: Send + Sync {
    /// Stores `trip` and the sheets built for its new id in one write.
    fn insert_trip(
        &self,
        trip: NewTrip,
        sheets: &dyn Fn(TripId) -> Vec<LogSheet>,
    ) -> Result<TripRecord, StoreError>;

    fn trip(&self, trip_id: TripId) -> Result<Option<TripRecord>, StoreError>;

    /// Sheets ordered by day number; empty when none were stored.
    fn log_sheets(&self, trip_id: TripId) -> Result<Vec<LogSheet>, StoreError>;
}

/// In-memory trip store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTripStore {
    data: Arc<RwLock<StoreData>>,
}

#[derive(Debug, Default)]
struct StoreData {
    trips: HashMap<TripId, TripRecord>,
    log_sheets: HashMap<TripId, Vec<LogSheet>>,
    last_trip_id: TripId,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip_count(&self) -> usize {
        self.data.read().map(|data| data.trips.len()).unwrap_or(0)
    }
}

impl TripStore for InMemoryTripStore {
    fn insert_trip(
        &self,
        trip: NewTrip,
        sheets: &dyn Fn(TripId) -> Vec<LogSheet>,
    ) -> Result<TripRecord, StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::Poisoned)?;
        let id = data.last_trip_id + 1;

        let mut sheets = sheets(id);
        sheets.sort_by_key(|sheet| sheet.day_number);

        let record = TripRecord {
            id,
            current_location: trip.current_location,
            pickup_location: trip.pickup_location,
            dropoff_location: trip.dropoff_location,
            current_cycle_hours: trip.current_cycle_hours,
            created_at: trip.created_at,
        };
        data.last_trip_id = id;
        data.trips.insert(id, record.clone());
        data.log_sheets.insert(id, sheets);
        Ok(record)
    }

    fn trip(&self, trip_id: TripId) -> Result<Option<TripRecord>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.trips.get(&trip_id).cloned())
    }

    fn log_sheets(&self, trip_id: TripId) -> Result<Vec<LogSheet>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::Poisoned)?;
        Ok(data.log_sheets.get(&trip_id).cloned().unwrap_or_default())
    }
}
