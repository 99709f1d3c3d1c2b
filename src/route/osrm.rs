//! OSRM routing backend
//!
//! Calls `/route/v1/{profile}/{lng},{lat};{lng},{lat}` with full GeoJSON
//! geometry. OSRM orders every coordinate pair as longitude first.

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::route::{RouteBackend, RouteEstimate};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Routes via an OSRM HTTP endpoint
#[derive(Debug, Clone)]
pub struct OsrmBackend {
    client: reqwest::Client,
    endpoint: String,
    profile: String,
}

/// Minimal OSRM JSON response structures
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64, // metres
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>, // [lng, lat]
}

impl OsrmBackend {
    pub fn new(endpoint: &str, profile: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            profile: profile.to_string(),
        }
    }

    fn route_url(&self, pickup: Coordinates, drop: Coordinates) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.endpoint, self.profile, pickup.lng, pickup.lat, drop.lng, drop.lat,
        )
    }

    fn into_estimate(response: OsrmResponse) -> Result<RouteEstimate> {
        if response.code != "Ok" {
            return Err(Error::RouteUnavailable(format!(
                "OSRM returned code {}",
                response.code
            )));
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| Error::RouteUnavailable("OSRM returned no routes".to_string()))?;

        let path = route
            .geometry
            .coordinates
            .iter()
            .map(|[lng, lat]| Coordinates::new(*lat, *lng))
            .collect();

        Ok(RouteEstimate::from_meters(route.distance, path))
    }
}

impl RouteBackend for OsrmBackend {
    async fn route(&self, pickup: Coordinates, drop: Coordinates) -> Result<RouteEstimate> {
        let url = self.route_url(pickup, drop);
        debug!(%url, "requesting route");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::RouteUnavailable(format!("OSRM request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::RouteUnavailable(format!(
                "OSRM returned status: {}",
                response.status()
            )));
        }

        let body: OsrmResponse = response
            .json()
            .await
            .map_err(|e| Error::RouteUnavailable(format!("Failed to parse OSRM response: {}", e)))?;

        Self::into_estimate(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> OsrmBackend {
        OsrmBackend::new("https://osrm.example/", "driving", Duration::from_secs(5))
    }

    #[test]
    fn test_route_url_is_lng_lat_pickup_first() {
        let url = backend().route_url(
            Coordinates::new(28.6139, 77.209),
            Coordinates::new(19.076, 72.8777),
        );
        assert_eq!(
            url,
            "https://osrm.example/route/v1/driving/77.209,28.6139;72.8777,19.076?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn test_parse_route() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 1150123.4,
                "duration": 70000.0,
                "geometry": {"type": "LineString", "coordinates": [[77.209, 28.6139], [72.8777, 19.076]]}
            }]
        }"#;
        let response: OsrmResponse = serde_json::from_str(body).unwrap();
        let estimate = OsrmBackend::into_estimate(response).unwrap();

        assert_eq!(estimate.distance_km, 1150.12);
        assert_eq!(estimate.path.len(), 2);
        assert_eq!(estimate.path[0], Coordinates::new(28.6139, 77.209));
    }

    #[test]
    fn test_no_route_code() {
        let response: OsrmResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "Impossible route"}"#).unwrap();
        let err = OsrmBackend::into_estimate(response).unwrap_err();
        assert!(matches!(err, Error::RouteUnavailable(_)));
    }

    #[test]
    fn test_empty_route_list() {
        let response: OsrmResponse =
            serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
        assert!(matches!(
            OsrmBackend::into_estimate(response),
            Err(Error::RouteUnavailable(_))
        ));
    }
}
