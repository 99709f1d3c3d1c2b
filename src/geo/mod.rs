//! Geographic primitives and geocoding
//!
//! Coordinates, the serviceable-region filter, and the geocoding backend trait.

pub mod nominatim;
pub mod resolver;

use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Short label used when a location is picked on the map
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = String;

    /// Parses "lat,lng"
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("Expected LAT,LNG but got: {}", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| format!("Invalid latitude: {}", lat))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| format!("Invalid longitude: {}", lng))?;
        Ok(Self::new(lat, lng))
    }
}

/// Rectangular serviceable region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Edges count as inside.
    pub fn contains(&self, coords: Coordinates) -> bool {
        is_within_bounds(coords, self)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        use crate::constants::region;
        Self {
            north: region::NORTH,
            south: region::SOUTH,
            east: region::EAST,
            west: region::WEST,
        }
    }
}

/// Check that a coordinate lies inside the bounding box
pub fn is_within_bounds(coords: Coordinates, bounds: &Bounds) -> bool {
    coords.lat >= bounds.south
        && coords.lat <= bounds.north
        && coords.lng >= bounds.west
        && coords.lng <= bounds.east
}

/// A geocoded location result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

impl GeoLocation {
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Geocode a location string to coordinates
    ///
    /// Returns the first candidate for the query, or None if there is none
    fn geocode(&self, query: &str) -> impl std::future::Future<Output = Result<Option<GeoLocation>>> + Send;
}

/// Get the configured geocoding backend
pub fn get_geocoder(config: &Config) -> nominatim::NominatimBackend {
    nominatim::NominatimBackend::new(&config.geocoding.endpoint)
        .with_country_codes(&config.geocoding.country_codes)
}
