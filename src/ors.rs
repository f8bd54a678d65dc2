//! openrouteservice HTTP adapter for geocoding, directions and POIs.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::polyline::Polyline;
use crate::traits::{Coordinates, PointOfInterest, Route, RouteError, RoutePlanner};

const UNKNOWN_POI: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub api_key: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Search radius around the route for POIs.
    pub poi_buffer_meters: u32,
    /// openrouteservice POI category ids to match.
    pub poi_categories: Vec<u32>,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            api_key: String::new(),
            profile: "driving-car".to_string(),
            timeout_secs: 10,
            poi_buffer_meters: 1000,
            poi_categories: vec![101, 102, 103, 104],
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

impl RoutePlanner for OrsClient {
    fn geocode(&self, address: &str) -> Option<Coordinates> {
        let response = self
            .client
            .get(self.url("geocode/search"))
            .header("Authorization", &self.config.api_key)
            .query(&[("text", address), ("size", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<GeocodeResponse>());

        match response {
            Ok(body) => {
                let found = best_match(body);
                debug!(address, found = found.is_some(), "geocoded address");
                found
            }
            Err(err) => {
                warn!(address, error = %err, "geocoding request failed");
                None
            }
        }
    }

    fn route(&self, from: Coordinates, to: Coordinates) -> Result<Route, RouteError> {
        let start = format!("{:.6},{:.6}", from.lng, from.lat);
        let end = format!("{:.6},{:.6}", to.lng, to.lat);

        let response = self
            .client
            .get(self.url(&format!("v2/directions/{}", self.config.profile)))
            .header("Authorization", &self.config.api_key)
            .query(&[("start", start.as_str()), ("end", end.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RouteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json::<DirectionsResponse>()?;
        into_route(body)
    }

    fn points_of_interest(&self, path: &[Coordinates]) -> Vec<PointOfInterest> {
        // A LineString needs at least two positions.
        if path.len() < 2 {
            return Vec::new();
        }

        let body = json!({
            "request": "pois",
            "geometry": {
                "buffer": self.config.poi_buffer_meters,
                "geojson": {
                    "type": "LineString",
                    "coordinates": path.iter().map(|point| point.to_lng_lat()).collect::<Vec<_>>(),
                },
            },
            "filters": {
                "category_ids": self.config.poi_categories,
            },
        });

        let response = self
            .client
            .post(self.url("pois"))
            .header("Authorization", &self.config.api_key)
            .json(&body)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<PoiResponse>());

        match response {
            Ok(body) => into_points_of_interest(body),
            Err(err) => {
                warn!(error = %err, "POI request failed");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "openrouteservice"
    }
}

fn best_match(body: GeocodeResponse) -> Option<Coordinates> {
    body.features
        .into_iter()
        .next()
        .map(|feature| Coordinates::from_lng_lat(feature.geometry.coordinates))
}

fn into_route(body: DirectionsResponse) -> Result<Route, RouteError> {
    let feature = body.features.into_iter().next().ok_or(RouteError::NoRoute)?;
    let (distance_meters, duration_seconds) = feature
        .properties
        .segments
        .iter()
        .fold((0.0, 0.0), |(distance, duration), segment| {
            (distance + segment.distance, duration + segment.duration)
        });

    Ok(Route {
        distance_meters,
        duration_seconds,
        path: Polyline::from_lng_lat(&feature.geometry.coordinates),
    })
}

fn into_points_of_interest(body: PoiResponse) -> Vec<PointOfInterest> {
    body.features
        .into_iter()
        .map(|feature| {
            let properties = feature.properties;
            let label = properties
                .name
                .or_else(|| properties.osm_tags.and_then(|tags| tags.name))
                .unwrap_or_else(|| UNKNOWN_POI.to_string());
            PointOfInterest {
                label,
                coordinates: Coordinates::from_lng_lat(feature.geometry.coordinates),
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<PointFeature>,
}

#[derive(Debug, Deserialize)]
struct PointFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    features: Vec<DirectionsFeature>,
}

#[derive(Debug, Deserialize)]
struct DirectionsFeature {
    properties: DirectionsProperties,
    geometry: LineGeometry,
}

#[derive(Debug, Deserialize)]
struct DirectionsProperties {
    #[serde(default)]
    segments: Vec<DirectionsSegment>,
}

#[derive(Debug, Deserialize)]
struct DirectionsSegment {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct PoiResponse {
    #[serde(default)]
    features: Vec<PoiFeature>,
}

#[derive(Debug, Deserialize)]
struct PoiFeature {
    geometry: PointGeometry,
    #[serde(default)]
    properties: PoiProperties,
}

#[derive(Debug, Default, Deserialize)]
struct PoiProperties {
    name: Option<String>,
    osm_tags: Option<OsmTags>,
}

#[derive(Debug, Deserialize)]
struct OsmTags {
    name: Option<String>,
}
