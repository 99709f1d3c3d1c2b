//! Estimate command handler
//!
//! Resolves a pickup and a drop, routes between them and prints the quotes.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, EstimateReport};
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{get_geocoder, Coordinates, GeoBackend};
use crate::route::osrm::OsrmBackend;
use crate::route::{get_router, RouteBackend};
use crate::session::{RideSession, Slot};
use crate::storage::FileStore;
use clap::Args;
use std::sync::Arc;

/// Pickup and drop, each given as a place name or as coordinates
#[derive(Args, Debug, Clone)]
pub struct LocationArgs {
    /// Pickup place name (geocoded)
    #[arg(long, conflicts_with = "from_at")]
    pub from: Option<String>,

    /// Pickup as LAT,LNG
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub from_at: Option<Coordinates>,

    /// Drop place name (geocoded)
    #[arg(long, conflicts_with = "to_at")]
    pub to: Option<String>,

    /// Drop as LAT,LNG
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub to_at: Option<Coordinates>,
}

impl LocationArgs {
    /// Both ends must be given, one way or the other
    pub fn validate(&self) -> Result<()> {
        if self.from.is_none() && self.from_at.is_none() {
            return Err(Error::Config("Specify a pickup with --from or --from-at".to_string()));
        }
        if self.to.is_none() && self.to_at.is_none() {
            return Err(Error::Config("Specify a drop with --to or --to-at".to_string()));
        }
        Ok(())
    }
}

/// Estimate command arguments
#[derive(Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub locations: LocationArgs,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats", exclusive = true)]
    pub list_formats: bool,
}

/// Session wired to the configured geocoder, router and data dir
pub fn open_session(config: &Config) -> Result<RideSession<NominatimBackend, OsrmBackend>> {
    let store = FileStore::from_config(config)?;
    Ok(RideSession::from_config(
        config,
        get_geocoder(config),
        get_router(config),
        Arc::new(store),
    ))
}

/// Fill pickup then drop; routing runs once both are known
pub async fn fill_locations<G: GeoBackend, R: RouteBackend>(
    session: &mut RideSession<G, R>,
    locations: &LocationArgs,
) -> Result<()> {
    locations.validate()?;
    fill(session, Slot::Pickup, locations.from.as_deref(), locations.from_at).await?;
    fill(session, Slot::Drop, locations.to.as_deref(), locations.to_at).await
}

async fn fill<G: GeoBackend, R: RouteBackend>(
    session: &mut RideSession<G, R>,
    slot: Slot,
    text: Option<&str>,
    at: Option<Coordinates>,
) -> Result<()> {
    if let Some(coords) = at {
        session.click_map(coords).await?;
        return Ok(());
    }

    let text = text.unwrap_or_default();
    match session.enter_text_now(slot, text).await? {
        Some(coords) => {
            eprintln!("{}: {} ({})", slot, text, coords.label());
            Ok(())
        }
        None => Err(Error::NotFound(text.to_string())),
    }
}

/// Run the estimate command
pub async fn run(args: EstimateArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let format = args.format.unwrap_or(config.display.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let mut session = open_session(&config)?;
    fill_locations(&mut session, &args.locations).await?;

    if session.distance_km().is_none() {
        eprintln!("Warning: route unavailable, showing base fares");
    }

    let report = EstimateReport::from_snapshot(&session.snapshot())
        .ok_or_else(|| Error::InvalidState("pickup or drop unresolved".to_string()))?;
    let output = formatter.format(&report, &config)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::resolver::LocationResolver;
    use crate::geo::Bounds;
    use crate::session::SessionState;
    use crate::storage::MemoryStore;
    use crate::testing::{StubGeocoder, StubRouter};

    fn session() -> RideSession<StubGeocoder, StubRouter> {
        let geocoder = StubGeocoder::new()
            .with("Connaught Place", 28.6315, 77.2167)
            .with("Goa", 15.2993, 74.1240)
            .with("Pune", 18.5204, 73.8567);
        RideSession::new(
            LocationResolver::new(geocoder, Bounds::default(), 3),
            StubRouter::with_distance(12.5),
            Arc::new(MemoryStore::new()),
        )
    }

    fn locations(from: Option<&str>, from_at: Option<Coordinates>, to: Option<&str>, to_at: Option<Coordinates>) -> LocationArgs {
        LocationArgs {
            from: from.map(String::from),
            from_at,
            to: to.map(String::from),
            to_at,
        }
    }

    #[tokio::test]
    async fn test_fill_text_and_coordinates() {
        let mut session = session();
        let args = locations(
            Some("Connaught Place"),
            None,
            None,
            Some(Coordinates::new(28.5562, 77.1000)),
        );

        fill_locations(&mut session, &args).await.unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.pickup().raw_text, "Connaught Place");
        assert_eq!(session.drop_location().raw_text, "28.5562, 77.1000");
        assert_eq!(session.distance_km(), Some(12.5));
    }

    #[tokio::test]
    async fn test_fill_coordinates_then_text() {
        let mut session = session();
        let args = locations(
            None,
            Some(Coordinates::new(28.5562, 77.1000)),
            Some("Connaught Place"),
            None,
        );

        fill_locations(&mut session, &args).await.unwrap();

        assert_eq!(session.pickup().coords, Some(Coordinates::new(28.5562, 77.1000)));
        assert_eq!(session.drop_location().raw_text, "Connaught Place");
    }

    #[tokio::test]
    async fn test_fill_requires_both_ends() {
        let mut session = session();
        let args = locations(Some("Connaught Place"), None, None, None);

        let err = fill_locations(&mut session, &args).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(session.pickup().coords, None);
    }

    #[tokio::test]
    async fn test_fill_unknown_place() {
        let mut session = session();
        let args = locations(Some("Nowhere Town"), None, Some("Connaught Place"), None);

        let err = fill_locations(&mut session, &args).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(q) if q == "Nowhere Town"));
    }

    #[tokio::test]
    async fn test_fill_short_place_names() {
        let mut session = session();
        let args = locations(Some("Goa"), None, Some("Pune"), None);

        fill_locations(&mut session, &args).await.unwrap();

        assert_eq!(session.pickup().coords, Some(Coordinates::new(15.2993, 74.1240)));
        assert_eq!(session.drop_location().coords, Some(Coordinates::new(18.5204, 73.8567)));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_fill_out_of_region() {
        let mut session = session();
        let args = locations(
            Some("Connaught Place"),
            None,
            None,
            Some(Coordinates::new(51.5074, -0.1278)),
        );

        let err = fill_locations(&mut session, &args).await.unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
        assert_eq!(session.drop_location().coords, None);
    }
}
