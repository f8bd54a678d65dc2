//! Polyline representation for route geometries.
//!
//! Stores decoded points in travel order. Upstream services hand us
//! GeoJSON `[lng, lat]` pairs; conversion happens at that boundary.

use serde::{Deserialize, Serialize};

use crate::traits::Coordinates;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Coordinates>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinates>) -> Self {
        Self { points }
    }

    /// Builds a polyline from GeoJSON `[lng, lat]` pairs.
    pub fn from_lng_lat(pairs: &[[f64; 2]]) -> Self {
        Self {
            points: pairs.iter().copied().map(Coordinates::from_lng_lat).collect(),
        }
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends `other`, skipping its first point when it repeats our last.
    pub fn append(&mut self, other: Polyline) {
        let mut incoming = other.points.into_iter().peekable();
        if let (Some(last), Some(first)) = (self.points.last(), incoming.peek()) {
            if last == first {
                incoming.next();
            }
        }
        self.points.extend(incoming);
    }

    /// Every `step`-th point plus the final point.
    ///
    /// Keeps lookups along long routes to a bounded request size.
    pub fn sample(&self, step: usize) -> Vec<Coordinates> {
        let step = step.max(1);
        let mut sampled: Vec<Coordinates> = self.points.iter().step_by(step).copied().collect();
        if let Some(last) = self.points.last() {
            if (self.points.len() - 1) % step != 0 {
                sampled.push(*last);
            }
        }
        sampled
    }
}
