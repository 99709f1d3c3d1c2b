//! Book command handler
//!
//! Runs a whole session: resolve, estimate, select, log-in check, pay, store.

use crate::cli::estimate::{fill_locations, open_session, LocationArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fare::RideClass;
use crate::payment::SimulatedPayment;
use crate::session::BookingStep;
use clap::Args;

/// Book command arguments
#[derive(Args)]
pub struct BookArgs {
    #[command(flatten)]
    pub locations: LocationArgs,

    /// Ride class: go, premier or xl
    #[arg(long, short = 'r')]
    pub ride: RideClass,
}

/// Run the book command
pub async fn run(args: BookArgs) -> Result<()> {
    let config = Config::load()?;
    let currency = &config.display.currency;

    let mut session = open_session(&config)?;
    fill_locations(&mut session, &args.locations).await?;
    session.select_ride(args.ride)?;

    match session.request_booking()? {
        BookingStep::LoginRequired => {
            eprintln!("Please log in before booking:");
            eprintln!("  ride-ease login --email <EMAIL> --password <PASSWORD>");
            std::process::exit(1);
        }
        BookingStep::Payment { amount } => {
            eprintln!("Processing payment of {}{}...", currency, amount);
        }
    }

    let gateway = SimulatedPayment::from_millis(config.payment.processing_delay_ms);
    let record = session
        .pay(&gateway)
        .await?
        .ok_or_else(|| Error::InvalidState("payment was cancelled".to_string()))?;

    let index = session.bookings().len()?.saturating_sub(1);
    println!("Ride booked (#{})", index);
    println!("  {} -> {}", record.pickup, record.drop);
    println!(
        "  {} | {}{} | ETA {}",
        record.ride.display_name, currency, record.ride.price, record.ride.eta
    );
    if let Some(km) = record.distance_km {
        println!("  {:.2} km", km);
    }

    Ok(())
}
