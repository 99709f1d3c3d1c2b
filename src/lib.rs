//! ride-ease: ride fare estimates and bookings
//!
//! A library and CLI tool that takes a pickup and a drop inside a service
//! region, routes between them, prices three ride classes and books one
//! through a simulated login and payment step.
//!
//! ## Features
//!
//! - Place search (Nominatim) and map clicks, limited to a bounding box
//! - Road distance and path from OSRM
//! - Per-class fares and travel times
//! - Booked rides persisted as JSON, with an ongoing/completed status
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use ride_ease::fare::compute_quotes;
//!
//! // Delhi to Mumbai by road
//! let quotes = compute_quotes(1150.0);
//! assert_eq!(quotes[0].price, "13820.00");
//! assert_eq!(quotes[0].eta, "28h 45m");
//! ```

pub mod auth;
pub mod booking;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod fare;
pub mod format;
pub mod geo;
pub mod payment;
pub mod route;
pub mod server;
pub mod session;
pub mod storage;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use fare::{compute_quotes, RideClass, RideQuote};
pub use geo::{Bounds, Coordinates};
pub use session::{RideSession, SessionState};
