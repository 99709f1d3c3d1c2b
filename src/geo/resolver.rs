//! Location resolution
//!
//! Turns a free-text query or a map click into a coordinate inside the
//! serviceable region.

use crate::error::{Error, Result};
use crate::geo::{Bounds, Coordinates, GeoBackend, GeoLocation};
use tracing::debug;

/// Resolves pickup/drop input against a geocoder and the region bounds
#[derive(Debug, Clone)]
pub struct LocationResolver<G> {
    geocoder: G,
    bounds: Bounds,
    min_query_chars: usize,
}

impl<G: GeoBackend> LocationResolver<G> {
    pub fn new(geocoder: G, bounds: Bounds, min_query_chars: usize) -> Self {
        Self {
            geocoder,
            bounds,
            min_query_chars,
        }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Whether a query is long enough to be sent to the geocoder
    pub fn should_geocode(&self, query: &str) -> bool {
        query.trim().chars().count() > self.min_query_chars
    }

    /// Geocode a query and keep the first candidate
    ///
    /// Fails with `NotFound` when there is no candidate and `OutOfBounds`
    /// when the candidate lies outside the region.
    pub async fn resolve_by_text(&self, query: &str) -> Result<GeoLocation> {
        let location = self
            .geocoder
            .geocode(query)
            .await?
            .ok_or_else(|| Error::NotFound(query.to_string()))?;

        self.check(location.coords())?;
        debug!(query, lat = location.lat, lng = location.lng, "resolved location");
        Ok(location)
    }

    /// Validate a clicked point
    pub fn resolve_by_click(&self, coords: Coordinates) -> Result<Coordinates> {
        self.check(coords)?;
        Ok(coords)
    }

    fn check(&self, coords: Coordinates) -> Result<()> {
        if self.bounds.contains(coords) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                lat: coords.lat,
                lng: coords.lng,
            })
        }
    }
}
