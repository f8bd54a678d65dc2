//! Configuration management

use std::str::FromStr;

use crate::hos::HosRules;
use crate::ors::OrsConfig;
use crate::trip::TripOptions;

/// Which planner backs geocoding and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingBackend {
    /// openrouteservice (needs an API key)
    Ors,
    /// Offline great-circle estimates, no network
    Haversine,
}

impl FromStr for RoutingBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ors" | "openrouteservice" => Ok(RoutingBackend::Ors),
            "haversine" | "offline" => Ok(RoutingBackend::Haversine),
            _ => Err(ConfigError::Invalid {
                key: "ROUTING_BACKEND",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: RoutingBackend,
    pub ors: OrsConfig,
    pub rules: HosRules,
    pub poi_sample_step: usize,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns the raw value of a key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("ROUTING_BACKEND") {
            Some(value) => value.parse()?,
            None => RoutingBackend::Ors,
        };

        let defaults = OrsConfig::default();
        let api_key = lookup("ORS_API_KEY").unwrap_or_default();
        if backend == RoutingBackend::Ors && api_key.is_empty() {
            return Err(ConfigError::Missing("ORS_API_KEY"));
        }

        let ors = OrsConfig {
            base_url: lookup("ORS_URL").unwrap_or(defaults.base_url),
            api_key,
            profile: lookup("ORS_PROFILE").unwrap_or(defaults.profile),
            timeout_secs: parsed(&lookup, "HTTP_TIMEOUT_SECS", defaults.timeout_secs)?,
            poi_buffer_meters: parsed(&lookup, "POI_BUFFER_METERS", defaults.poi_buffer_meters)?,
            poi_categories: defaults.poi_categories,
        };

        let rules = rules_from(&lookup)?;

        let poi_sample_step = parsed(&lookup, "POI_SAMPLE_STEP", TripOptions::default().poi_sample_step)?;
        if poi_sample_step == 0 {
            return Err(ConfigError::Invalid {
                key: "POI_SAMPLE_STEP",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            backend,
            ors,
            rules,
            poi_sample_step,
        })
    }

    /// Duty-cycle rules alone, for callers that never route.
    pub fn rules_from_env() -> Result<HosRules, ConfigError> {
        dotenvy::dotenv().ok();
        rules_from(&|key: &str| std::env::var(key).ok())
    }

    pub fn trip_options(&self) -> TripOptions {
        TripOptions {
            rules: self.rules,
            poi_sample_step: self.poi_sample_step,
        }
    }
}

fn rules_from<F>(lookup: &F) -> Result<HosRules, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = HosRules::default();
    Ok(HosRules {
        driving_limit: hours(lookup, "HOS_DRIVING_LIMIT", base.driving_limit, Bound::Positive)?,
        duty_window: hours(lookup, "HOS_DUTY_WINDOW", base.duty_window, Bound::NonNegative)?,
        rest_required: hours(lookup, "HOS_REST_REQUIRED", base.rest_required, Bound::Positive)?,
        on_duty_hours: hours(lookup, "HOS_ON_DUTY_HOURS", base.on_duty_hours, Bound::Positive)?,
        cycle_limit: hours(lookup, "HOS_CYCLE_LIMIT", base.cycle_limit, Bound::NonNegative)?,
    })
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Positive,
    NonNegative,
}

fn hours<F>(lookup: &F, key: &'static str, default: f64, bound: Bound) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: f64 = parsed(lookup, key, default)?;
    let in_range = match bound {
        Bound::Positive => value > 0.0,
        Bound::NonNegative => value >= 0.0,
    };
    if value.is_finite() && in_range {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}
