//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim search API, scoped to the serviceable country.
//! Rate limit: 1 request per second; callers length-gate queries before
//! reaching this backend.

use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, GeoLocation};
use serde::Deserialize;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    endpoint: String,
    country_codes: Option<String>,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimBackend {
    /// Create a new Nominatim backend against the given base URL
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            country_codes: None,
        }
    }

    /// Restrict results to the given comma separated country codes
    pub fn with_country_codes(mut self, codes: &str) -> Self {
        self.country_codes = if codes.is_empty() {
            None
        } else {
            Some(codes.to_string())
        };
        self
    }

    fn search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}/search?q={}&format=json",
            self.endpoint,
            urlencoding::encode(query)
        );
        if let Some(codes) = &self.country_codes {
            url.push_str(&format!("&countrycodes={}", urlencoding::encode(codes)));
        }
        url
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat.parse().map_err(|_| {
            Error::Geo(format!("Invalid latitude: {}", lat))
        })?;
        let lng: f64 = lng.parse().map_err(|_| {
            Error::Geo(format!("Invalid longitude: {}", lng))
        })?;
        Ok((lat, lng))
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode(&self, query: &str) -> Result<Option<GeoLocation>> {
        let url = self.search_url(query);

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse Nominatim response: {}", e)))?;

        match results.into_iter().next() {
            Some(result) => {
                let (lat, lng) = Self::parse_coords(&result.lat, &result.lon)?;
                Ok(Some(GeoLocation {
                    lat,
                    lng,
                    display_name: result.display_name,
                }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coords() {
        let (lat, lng) = NominatimBackend::parse_coords("28.6139", "77.2090").unwrap();
        assert!((lat - 28.6139).abs() < 0.0001);
        assert!((lng - 77.2090).abs() < 0.0001);
    }

    #[test]
    fn test_parse_coords_invalid() {
        assert!(NominatimBackend::parse_coords("invalid", "0").is_err());
        assert!(NominatimBackend::parse_coords("0", "invalid").is_err());
    }

    #[test]
    fn test_search_url_with_country_scope() {
        let backend = NominatimBackend::new("https://nominatim.example/").with_country_codes("in");
        assert_eq!(
            backend.search_url("New Delhi"),
            "https://nominatim.example/search?q=New%20Delhi&format=json&countrycodes=in"
        );
    }

    #[test]
    fn test_search_url_without_country_scope() {
        let backend = NominatimBackend::new("https://nominatim.example").with_country_codes("");
        assert!(!backend.search_url("Pune").contains("countrycodes"));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"[{"lat":"19.0760","lon":"72.8777","display_name":"Mumbai, Maharashtra, India","importance":0.8}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(body).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].lon, "72.8777");
    }
}
