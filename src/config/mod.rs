//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/ride-ease/config.toml

pub mod defaults;

use crate::constants::{api, region};
use crate::error::{Error, Result};
use crate::geo::{Bounds, Coordinates};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Serviceable region and initial map center
    #[serde(default)]
    pub region: RegionConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Routing service settings
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Simulated payment settings
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Demo login credentials
    #[serde(default)]
    pub auth: AuthConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Where bookings and the login flag are kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Bounding box of the serviceable region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_north")]
    pub north: f64,
    #[serde(default = "default_south")]
    pub south: f64,
    #[serde(default = "default_east")]
    pub east: f64,
    #[serde(default = "default_west")]
    pub west: f64,

    /// Map center before any location is chosen
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    #[serde(default = "default_geocoding_endpoint")]
    pub endpoint: String,

    /// Comma separated ISO country codes passed as `countrycodes`
    #[serde(default = "default_country_codes")]
    pub country_codes: String,

    /// Queries must be longer than this to be geocoded
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

/// Routing service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// OSRM base URL
    #[serde(default = "default_routing_endpoint")]
    pub endpoint: String,

    /// OSRM profile (driving, cycling, foot)
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Upper bound on a single route request
    #[serde(default = "default_routing_timeout")]
    pub timeout_secs: u64,
}

/// Simulated payment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    #[serde(default = "default_payment_delay")]
    pub processing_delay_ms: u64,
}

/// Demo login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_email")]
    pub email: String,
    #[serde(default = "default_auth_password")]
    pub password: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; empty means the XDG data dir
    #[serde(default)]
    pub data_dir: String,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Default output format for `estimate`
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_north() -> f64 {
    region::NORTH
}
fn default_south() -> f64 {
    region::SOUTH
}
fn default_east() -> f64 {
    region::EAST
}
fn default_west() -> f64 {
    region::WEST
}
fn default_center_lat() -> f64 {
    region::CENTER_LAT
}
fn default_center_lng() -> f64 {
    region::CENTER_LNG
}
fn default_geocoding_endpoint() -> String {
    api::NOMINATIM_URL.to_string()
}
fn default_country_codes() -> String {
    DEFAULT_COUNTRY_CODES.to_string()
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_routing_endpoint() -> String {
    api::OSRM_URL.to_string()
}
fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}
fn default_routing_timeout() -> u64 {
    DEFAULT_ROUTING_TIMEOUT_SECS
}
fn default_payment_delay() -> u64 {
    DEFAULT_PAYMENT_DELAY_MS
}
fn default_auth_email() -> String {
    DEFAULT_AUTH_EMAIL.to_string()
}
fn default_auth_password() -> String {
    DEFAULT_AUTH_PASSWORD.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            north: default_north(),
            south: default_south(),
            east: default_east(),
            west: default_west(),
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoding_endpoint(),
            country_codes: default_country_codes(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_routing_endpoint(),
            profile: default_profile(),
            timeout_secs: default_routing_timeout(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            processing_delay_ms: default_payment_delay(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            email: default_auth_email(),
            password: default_auth_password(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            format: default_format(),
        }
    }
}

impl RegionConfig {
    /// Bounding box as a filter value
    pub fn bounds(&self) -> Bounds {
        Bounds {
            north: self.north,
            south: self.south,
            east: self.east,
            west: self.west,
        }
    }

    /// Initial map center
    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.center_lat, self.center_lng)
    }
}

impl RoutingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Directory holding the key-value slots
    pub fn data_dir(&self) -> Result<PathBuf> {
        if !self.storage.data_dir.is_empty() {
            return Ok(PathBuf::from(&self.storage.data_dir));
        }
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["region", "north"] => Some(self.region.north.to_string()),
            ["region", "south"] => Some(self.region.south.to_string()),
            ["region", "east"] => Some(self.region.east.to_string()),
            ["region", "west"] => Some(self.region.west.to_string()),
            ["region", "center_lat"] => Some(self.region.center_lat.to_string()),
            ["region", "center_lng"] => Some(self.region.center_lng.to_string()),

            ["geocoding", "endpoint"] => Some(self.geocoding.endpoint.clone()),
            ["geocoding", "country_codes"] => Some(self.geocoding.country_codes.clone()),
            ["geocoding", "min_query_chars"] => Some(self.geocoding.min_query_chars.to_string()),

            ["routing", "endpoint"] => Some(self.routing.endpoint.clone()),
            ["routing", "profile"] => Some(self.routing.profile.clone()),
            ["routing", "timeout_secs"] => Some(self.routing.timeout_secs.to_string()),

            ["payment", "processing_delay_ms"] => {
                Some(self.payment.processing_delay_ms.to_string())
            }

            ["auth", "email"] => Some(self.auth.email.clone()),
            ["auth", "password"] => Some(self.auth.password.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["storage", "data_dir"] => Some(self.storage.data_dir.clone()),

            ["display", "currency"] => Some(self.display.currency.clone()),
            ["display", "format"] => Some(self.display.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["region", "north"] => self.region.north = parse_value(key, value)?,
            ["region", "south"] => self.region.south = parse_value(key, value)?,
            ["region", "east"] => self.region.east = parse_value(key, value)?,
            ["region", "west"] => self.region.west = parse_value(key, value)?,
            ["region", "center_lat"] => self.region.center_lat = parse_value(key, value)?,
            ["region", "center_lng"] => self.region.center_lng = parse_value(key, value)?,

            ["geocoding", "endpoint"] => self.geocoding.endpoint = value.to_string(),
            ["geocoding", "country_codes"] => self.geocoding.country_codes = value.to_string(),
            ["geocoding", "min_query_chars"] => {
                self.geocoding.min_query_chars = parse_value(key, value)?
            }

            ["routing", "endpoint"] => self.routing.endpoint = value.to_string(),
            ["routing", "profile"] => self.routing.profile = value.to_string(),
            ["routing", "timeout_secs"] => self.routing.timeout_secs = parse_value(key, value)?,

            ["payment", "processing_delay_ms"] => {
                self.payment.processing_delay_ms = parse_value(key, value)?
            }

            ["auth", "email"] => self.auth.email = value.to_string(),
            ["auth", "password"] => self.auth.password = value.to_string(),

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["storage", "data_dir"] => self.storage.data_dir = value.to_string(),

            ["display", "currency"] => self.display.currency = value.to_string(),
            ["display", "format"] => self.display.format = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "region.north",
            "region.south",
            "region.east",
            "region.west",
            "region.center_lat",
            "region.center_lng",
            "geocoding.endpoint",
            "geocoding.country_codes",
            "geocoding.min_query_chars",
            "routing.endpoint",
            "routing.profile",
            "routing.timeout_secs",
            "payment.processing_delay_ms",
            "auth.email",
            "auth.password",
            "server.host",
            "server.port",
            "storage.data_dir",
            "display.currency",
            "display.format",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
