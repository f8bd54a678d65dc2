//! Test fixtures for hos-trip-planner.
//!
//! Provides realistic test data:
//! - Real US freight hub locations (from OpenStreetMap)
//! - Scripted route planners for exercising the trip service

pub mod freight_locations;
pub mod planners;

pub use freight_locations::*;
pub use planners::*;
