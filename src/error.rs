//! Error types for ride-ease

use thiserror::Error;

/// Main error type for ride-ease operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Location ({lat:.4}, {lng:.4}) is outside the serviceable region")]
    OutOfBounds { lat: f64, lng: f64 },

    #[error("No location found for '{0}'")]
    NotFound(String),

    #[error("Route unavailable: {0}")]
    RouteUnavailable(String),

    #[error("Booking index {index} is out of range ({len} bookings)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Please select both pickup and drop locations")]
    MissingFields,

    #[error("No ride class selected")]
    NoRideSelected,

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Geo error: {0}")]
    Geo(String),
}

/// Result type alias for ride-ease operations
pub type Result<T> = std::result::Result<T, Error>;
