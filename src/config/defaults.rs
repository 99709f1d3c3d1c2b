//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default Nominatim country scope
pub const DEFAULT_COUNTRY_CODES: &str = "in";

/// Queries of this many characters or fewer are not geocoded
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// Default OSRM routing profile
pub const DEFAULT_PROFILE: &str = "driving";

/// Default routing timeout in seconds
pub const DEFAULT_ROUTING_TIMEOUT_SECS: u64 = 10;

/// Simulated payment processing time in milliseconds
pub const DEFAULT_PAYMENT_DELAY_MS: u64 = 2000;

/// Demo login email
pub const DEFAULT_AUTH_EMAIL: &str = "rider@rideease.app";

/// Demo login password
pub const DEFAULT_AUTH_PASSWORD: &str = "123456";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Currency symbol used when printing fares
pub const DEFAULT_CURRENCY: &str = "₹";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "ride-ease";
