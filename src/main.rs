//! hos-trip-planner - plan a trip and print its duty-cycle log as JSON.

mod cli;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use hos_trip_planner::config::{Config, RoutingBackend};
use hos_trip_planner::haversine::HaversinePlanner;
use hos_trip_planner::hos::{default_start_time, simulate_with};
use hos_trip_planner::ors::OrsClient;
use hos_trip_planner::store::InMemoryTripStore;
use hos_trip_planner::traits::RoutePlanner;
use hos_trip_planner::trip::{TripRequest, TripService};

use cli::{Cli, Command};

fn main() -> Result<()> {
    // .env may set RUST_LOG
    dotenvy::dotenv().ok();

    // stdout carries the JSON result, logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,hos_trip_planner=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let now = Local::now().naive_local();

    match cli.command {
        Command::Simulate {
            duration_hours,
            cycle_hours,
            start,
        } => {
            let rules = Config::rules_from_env().context("invalid HOS rule configuration")?;
            let start = start.unwrap_or_else(|| default_start_time(now));
            let result = simulate_with(&rules, duration_hours, cycle_hours, start)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Plan {
            current,
            pickup,
            dropoff,
            cycle_hours,
            start,
            places,
        } => {
            let config = Config::from_env().context("failed to load configuration")?;
            let planner: Box<dyn RoutePlanner> = match config.backend {
                RoutingBackend::Ors => {
                    Box::new(OrsClient::new(config.ors.clone()).context("failed to build HTTP client")?)
                }
                RoutingBackend::Haversine => Box::new(
                    places
                        .iter()
                        .fold(HaversinePlanner::default(), |planner, (name, coords)| {
                            planner.with_place(name, *coords)
                        }),
                ),
            };
            info!(planner = planner.name(), "planning trip");

            let service = TripService::new(planner, InMemoryTripStore::new(), config.trip_options());
            let request = TripRequest {
                current_location: current,
                pickup_location: pickup,
                dropoff_location: dropoff,
                current_cycle_hours: cycle_hours,
            };

            let start = start.unwrap_or_else(|| default_start_time(now));
            match service.plan_trip_at(&request, start, now) {
                Ok(plan) => println!("{}", serde_json::to_string_pretty(&plan)?),
                Err(err) if err.is_client_error() => {
                    println!("{}", serde_json::json!({ "error": err.to_string() }));
                    std::process::exit(2);
                }
                Err(err) => return Err(err).context("trip planning failed"),
            }
        }
    }

    Ok(())
}
