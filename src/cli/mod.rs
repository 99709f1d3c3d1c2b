//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod auth;
pub mod book;
pub mod config;
pub mod estimate;
pub mod rides;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Ride fare estimates and bookings
#[derive(Parser)]
#[command(name = "ride-ease")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate distance, fares and travel times between two places
    Estimate(estimate::EstimateArgs),

    /// Book a ride between two places
    Book(book::BookArgs),

    /// List and complete booked rides
    Rides(rides::RidesArgs),

    /// Log in with the demo account
    Login(auth::LoginArgs),

    /// Log out
    Logout,

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),
}

/// Send tracing output to stderr, filtered by `RUST_LOG` (default `info`)
fn init_logging() {
    // a second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Estimate(args) => estimate::run(args).await,
        Commands::Book(args) => book::run(args).await,
        Commands::Rides(args) => rides::run(args),
        Commands::Login(args) => auth::login(args),
        Commands::Logout => auth::logout(),
        Commands::Config(args) => config::run(args),
        Commands::Serve(args) => serve::run(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_estimate_with_click_and_text() {
        let cli = Cli::try_parse_from([
            "ride-ease", "estimate", "--from", "Delhi", "--to-at", "19.07,72.87", "-f", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Estimate(args) => {
                assert_eq!(args.locations.from.as_deref(), Some("Delhi"));
                assert!(args.locations.to_at.is_some());
                assert_eq!(args.format.as_deref(), Some("json"));
            }
            _ => panic!("expected estimate"),
        }
    }

    #[test]
    fn test_list_formats_alone() {
        assert!(Cli::try_parse_from(["ride-ease", "estimate", "-F"]).is_ok());
        assert!(Cli::try_parse_from(["ride-ease", "estimate", "-F", "--from", "Delhi"]).is_err());
    }

    #[test]
    fn test_estimate_rejects_text_and_coordinates_together() {
        assert!(Cli::try_parse_from([
            "ride-ease", "estimate", "--from", "Delhi", "--from-at", "28.6,77.2", "--to", "Agra"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_book_ride_class() {
        let cli = Cli::try_parse_from([
            "ride-ease", "book", "--from", "Delhi", "--to", "Agra", "--ride", "premier",
        ])
        .unwrap();

        match cli.command {
            Commands::Book(args) => assert_eq!(args.ride, crate::fare::RideClass::Premier),
            _ => panic!("expected book"),
        }
        assert!(Cli::try_parse_from([
            "ride-ease", "book", "--from", "Delhi", "--to", "Agra", "--ride", "rickshaw",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_rides_complete() {
        let cli = Cli::try_parse_from(["ride-ease", "rides", "complete", "2"]).unwrap();
        match cli.command {
            Commands::Rides(args) => {
                assert!(matches!(args.command, Some(rides::RidesCommand::Complete { index: 2 })))
            }
            _ => panic!("expected rides"),
        }
    }
}
