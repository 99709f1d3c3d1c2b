//! Centralized constants for the ride-ease crate
//!
//! Values shared by more than one module live here so the CLI, the server and
//! the session core agree on them.

/// Serviceable region (mainland India, a single rectangle)
pub mod region {
    pub const NORTH: f64 = 37.6;
    pub const SOUTH: f64 = 8.4;
    pub const EAST: f64 = 97.25;
    pub const WEST: f64 = 68.7;

    /// Initial map center
    pub const CENTER_LAT: f64 = 20.5937;
    pub const CENTER_LNG: f64 = 78.9629;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Public OSRM demo server
    pub const OSRM_URL: &str = "https://router.project-osrm.org";

    /// User agent sent to both services (Nominatim rejects anonymous clients)
    pub const USER_AGENT: &str = concat!("ride-ease/", env!("CARGO_PKG_VERSION"));
}

/// Key-value slot names
pub mod slots {
    /// JSON array of booking records
    pub const BOOKINGS: &str = "bookings";

    /// "true" while a user is logged in
    pub const AUTHENTICATED: &str = "authenticated";

    /// Email of the logged in user
    pub const USER_EMAIL: &str = "user_email";
}
