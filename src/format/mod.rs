//! Output formatters
//!
//! Provides trait-based output formatting for route estimates.

pub mod gpx;
pub mod json;
pub mod text;

use crate::config::Config;
use crate::error::Result;
use crate::fare::RideQuote;
use crate::geo::Coordinates;
use crate::session::SessionSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// One end of an estimated ride
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub label: String,
    pub coords: Coordinates,
}

/// Everything known about a pickup/drop pair once routing has run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub pickup: Waypoint,
    pub drop: Waypoint,
    /// `None` when routing failed and only placeholder quotes exist
    pub distance_km: Option<f64>,
    pub quotes: Vec<RideQuote>,
    #[serde(default)]
    pub path: Vec<Coordinates>,
}

impl EstimateReport {
    /// Build a report from a session that has both locations resolved
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Option<Self> {
        let pickup = snapshot.pickup.coords?;
        let drop = snapshot.drop.coords?;

        Some(Self {
            id: snapshot.id,
            generated_at: Utc::now(),
            pickup: Waypoint {
                label: snapshot.pickup.raw_text.clone(),
                coords: pickup,
            },
            drop: Waypoint {
                label: snapshot.drop.raw_text.clone(),
                coords: drop,
            },
            distance_km: snapshot.distance_km,
            quotes: snapshot.quotes.clone(),
            path: snapshot.map.polyline.clone().unwrap_or_default(),
        })
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format an estimate
    ///
    /// # Arguments
    /// * `report` - The estimate to format
    /// * `config` - Application config (currency symbol, etc.)
    fn format(&self, report: &EstimateReport, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON estimate".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
        FormatInfo {
            name: "gpx".to_string(),
            description: "GPX waypoints and route track".to_string(),
        },
    ]
}

#[cfg(test)]
pub(crate) fn sample_report() -> EstimateReport {
    use crate::fare::compute_quotes;

    let pickup = Coordinates::new(28.6139, 77.2090);
    let drop = Coordinates::new(19.0760, 72.8777);
    EstimateReport {
        id: Uuid::nil(),
        generated_at: Utc::now(),
        pickup: Waypoint {
            label: "Delhi".to_string(),
            coords: pickup,
        },
        drop: Waypoint {
            label: "Mumbai".to_string(),
            coords: drop,
        },
        distance_km: Some(1150.0),
        quotes: compute_quotes(1150.0),
        path: vec![pickup, Coordinates::new(23.0, 75.0), drop],
    }
}
