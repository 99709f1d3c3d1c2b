//! ride-ease CLI entry point
//!
//! Ride fare estimates and bookings - CLI + web API

use ride_ease::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
