//! hos-trip-planner core
//!
//! Plans commercial trips and simulates the driver's Hours-of-Service duty
//! cycle over them.

pub mod config;
pub mod haversine;
pub mod hos;
pub mod ors;
pub mod polyline;
pub mod store;
pub mod traits;
pub mod trip;
