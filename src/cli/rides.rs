//! Rides command handler
//!
//! View booked rides and mark them completed.

use crate::booking::{BookingRecord, BookingStatus, BookingStore};
use crate::config::Config;
use crate::error::Result;
use crate::storage::FileStore;
use clap::{Args, Subcommand};
use std::sync::Arc;

/// Rides command arguments
#[derive(Args)]
pub struct RidesArgs {
    #[command(subcommand)]
    pub command: Option<RidesCommand>,
}

/// Rides subcommands
#[derive(Subcommand)]
pub enum RidesCommand {
    /// List booked rides, oldest first
    List {
        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a ride completed
    Complete {
        /// Ride index as shown by `rides list`
        index: usize,
    },
}

/// Run the rides command
pub fn run(args: RidesArgs) -> Result<()> {
    let config = Config::load()?;
    let store = BookingStore::new(Arc::new(FileStore::from_config(&config)?));
    let command = args.command.unwrap_or(RidesCommand::List { json: false });

    match command {
        RidesCommand::List { json } => list_rides(&store, &config, json),
        RidesCommand::Complete { index } => complete_ride(&store, index),
    }
}

fn list_rides(store: &BookingStore, config: &Config, json: bool) -> Result<()> {
    let rides = store.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rides)?);
        return Ok(());
    }

    if rides.is_empty() {
        println!("No rides booked.");
        return Ok(());
    }

    println!("Your rides ({}):\n", rides.len());
    for (index, ride) in rides.iter().enumerate() {
        println!("{}", describe(index, ride, &config.display.currency));
    }

    Ok(())
}

fn complete_ride(store: &BookingStore, index: usize) -> Result<()> {
    let ride = store.mark_completed(index)?;
    println!("Ride #{} marked {}", index, ride.status);
    Ok(())
}

fn describe(index: usize, ride: &BookingRecord, currency: &str) -> String {
    let marker = match ride.status {
        BookingStatus::Ongoing => "*",
        BookingStatus::Completed => " ",
    };
    format!(
        "{} #{} [{}] {} -> {}\n    {} | {}{} | ETA {} | {}\n",
        marker,
        index,
        ride.status,
        ride.pickup,
        ride.drop,
        ride.ride.display_name,
        currency,
        ride.ride.price,
        ride.ride.eta,
        ride.created_at.format("%Y-%m-%d %H:%M UTC"),
    )
}
