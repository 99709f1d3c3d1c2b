//! Route estimation
//!
//! The routing service is the only network call between a pair of resolved
//! locations and a fare table. Backends implement [`RouteBackend`]; OSRM is
//! the default.

pub mod osrm;

use crate::config::Config;
use crate::error::Result;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// Distance and path between pickup and drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    /// Road distance in kilometres, rounded to 2 decimals
    pub distance_km: f64,
    /// Ordered path from pickup to drop
    pub path: Vec<Coordinates>,
}

impl RouteEstimate {
    /// Build an estimate from a distance in meters
    pub fn from_meters(meters: f64, path: Vec<Coordinates>) -> Self {
        Self {
            distance_km: round_km(meters / 1000.0),
            path,
        }
    }
}

/// Round to the 2 decimals shown to the user and used for fares
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Trait for routing backends
pub trait RouteBackend: Send + Sync {
    /// Route from pickup to drop
    ///
    /// Fails with `RouteUnavailable` when the service cannot produce a route.
    fn route(
        &self,
        pickup: Coordinates,
        drop: Coordinates,
    ) -> impl std::future::Future<Output = Result<RouteEstimate>> + Send;
}

/// Get the configured routing backend
pub fn get_router(config: &Config) -> osrm::OsrmBackend {
    osrm::OsrmBackend::new(
        &config.routing.endpoint,
        &config.routing.profile,
        config.routing.timeout(),
    )
}
