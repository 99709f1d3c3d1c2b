//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "routing.profile")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => {
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                std::process::exit(1);
            }
        }

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[region]");
    println!("north = {}", config.region.north);
    println!("south = {}", config.region.south);
    println!("east = {}", config.region.east);
    println!("west = {}", config.region.west);
    println!("center_lat = {}", config.region.center_lat);
    println!("center_lng = {}", config.region.center_lng);
    println!();

    println!("[geocoding]");
    println!("endpoint = \"{}\"", config.geocoding.endpoint);
    println!("country_codes = \"{}\"", config.geocoding.country_codes);
    println!("min_query_chars = {}", config.geocoding.min_query_chars);
    println!();

    println!("[routing]");
    println!("endpoint = \"{}\"", config.routing.endpoint);
    println!("profile = \"{}\"", config.routing.profile);
    println!("timeout_secs = {}", config.routing.timeout_secs);
    println!();

    println!("[payment]");
    println!("processing_delay_ms = {}", config.payment.processing_delay_ms);
    println!();

    println!("[auth]");
    println!("email = \"{}\"", config.auth.email);
    println!("password = \"***\"");
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[storage]");
    if config.storage.data_dir.is_empty() {
        println!("data_dir = \"\" # default data directory");
    } else {
        println!("data_dir = \"{}\"", config.storage.data_dir);
    }
    println!();

    println!("[display]");
    println!("currency = \"{}\"", config.display.currency);
    println!("format = \"{}\"", config.display.format);
}
