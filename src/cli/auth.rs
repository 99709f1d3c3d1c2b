//! Login and logout command handlers

use crate::auth::AuthGate;
use crate::config::Config;
use crate::error::Result;
use crate::storage::FileStore;
use clap::Args;
use std::sync::Arc;

/// Login command arguments
#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Account password
    #[arg(long, short = 'p')]
    pub password: String,
}

fn gate(config: &Config) -> Result<AuthGate> {
    Ok(AuthGate::new(Arc::new(FileStore::from_config(config)?)))
}

/// Run the login command
pub fn login(args: LoginArgs) -> Result<()> {
    let config = Config::load()?;
    gate(&config)?.login(&args.email, &args.password, &config.auth)?;
    println!("Logged in as {}", args.email.trim());
    Ok(())
}

/// Run the logout command
pub fn logout() -> Result<()> {
    let config = Config::load()?;
    gate(&config)?.logout()?;
    println!("Logged out");
    Ok(())
}
