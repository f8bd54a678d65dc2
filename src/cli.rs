//! CLI argument parsing for the hos-trip-planner binary.

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

use hos_trip_planner::traits::Coordinates;

#[derive(Parser)]
#[command(name = "hos-trip-planner", about = "Trip planner with Hours-of-Service duty logs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate the duty cycle for a known driving duration
    Simulate {
        /// Total driving time of the trip in hours
        #[arg(long)]
        duration_hours: f64,
        /// On-duty hours already used in the current 8-day cycle
        #[arg(long)]
        cycle_hours: f64,
        /// First driving block start, e.g. 2024-01-01T06:00 (default: 06:00 today)
        #[arg(long, value_parser = parse_start)]
        start: Option<NaiveDateTime>,
    },
    /// Geocode, route and simulate a full trip
    Plan {
        #[arg(long)]
        current: String,
        #[arg(long)]
        pickup: String,
        #[arg(long)]
        dropoff: String,
        /// On-duty hours already used in the current 8-day cycle
        #[arg(long)]
        cycle_hours: Option<f64>,
        /// First driving block start (default: 06:00 today)
        #[arg(long, value_parser = parse_start)]
        start: Option<NaiveDateTime>,
        /// Known place for the offline backend, as NAME=LAT,LNG (repeatable)
        #[arg(long = "place", value_parser = parse_place)]
        places: Vec<(String, Coordinates)>,
    },
}

pub fn parse_start(value: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("'{}' is not a date-time like 2024-01-01T06:00", value))
}

pub fn parse_place(value: &str) -> Result<(String, Coordinates), String> {
    let (name, coords) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("'{}' is not NAME=LAT,LNG", value))?;
    let (lat, lng) = coords
        .split_once(',')
        .ok_or_else(|| format!("'{}' is not LAT,LNG", coords))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{}'", lat))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude '{}'", lng))?;
    Ok((name.trim().to_string(), Coordinates::new(lat, lng)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_simulate_command_parses() {
        let cli = Cli::parse_from([
            "hos-trip-planner",
            "simulate",
            "--duration-hours",
            "25",
            "--cycle-hours",
            "60",
            "--start",
            "2024-01-01T06:00",
        ]);
        match cli.command {
            Command::Simulate {
                duration_hours,
                cycle_hours,
                start,
            } => {
                assert_eq!(duration_hours, 25.0);
                assert_eq!(cycle_hours, 60.0);
                assert_eq!(start, Some(parse_start("2024-01-01T06:00:00").unwrap()));
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_cli_plan_without_cycle_hours_parses() {
        let cli = Cli::parse_from([
            "hos-trip-planner",
            "plan",
            "--current",
            "Chicago, IL",
            "--pickup",
            "Indianapolis, IN",
            "--dropoff",
            "Nashville, TN",
            "--place",
            "Chicago, IL=41.8781,-87.6298",
        ]);
        match cli.command {
            Command::Plan {
                cycle_hours, places, ..
            } => {
                assert!(cycle_hours.is_none());
                assert_eq!(places.len(), 1);
                assert_eq!(places[0].0, "Chicago, IL");
                assert_eq!(places[0].1, Coordinates::new(41.8781, -87.6298));
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn test_parse_place_rejects_garbage() {
        assert!(parse_place("Chicago").is_err());
        assert!(parse_place("Chicago=41.8").is_err());
        assert!(parse_place("Chicago=north,-87.6").is_err());
    }

    #[test]
    fn test_parse_start_rejects_date_only() {
        assert!(parse_start("2024-01-01").is_err());
    }
}
