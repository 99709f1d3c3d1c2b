//! Simulated login
//!
//! There are no user accounts: a single demo credential pair from the config
//! flips an `authenticated` flag in the key-value store. The booking flow
//! reads the flag once, when a booking is requested.

use crate::config::AuthConfig;
use crate::constants::slots;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Reads and writes the login flag
#[derive(Debug, Clone)]
pub struct AuthGate {
    store: Arc<dyn KeyValueStore>,
}

impl AuthGate {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether a user is logged in
    ///
    /// An unreadable flag counts as logged out and is logged as a warning.
    pub fn is_authenticated(&self) -> bool {
        match self.store.get(slots::AUTHENTICATED) {
            Ok(flag) => flag.is_some_and(|v| v.trim() == "true"),
            Err(e) => {
                warn!(error = %e, "could not read login flag, treating as logged out");
                false
            }
        }
    }

    /// Email of the logged in user, if any
    pub fn user_email(&self) -> Result<Option<String>> {
        if !self.is_authenticated() {
            return Ok(None);
        }
        self.store.get(slots::USER_EMAIL)
    }

    /// Check credentials against the demo account and set the flag
    pub fn login(&self, email: &str, password: &str, account: &AuthConfig) -> Result<()> {
        if email.trim() != account.email || password != account.password {
            return Err(Error::InvalidCredentials);
        }

        self.store.set(slots::AUTHENTICATED, "true")?;
        self.store.set(slots::USER_EMAIL, email.trim())?;
        info!(email = email.trim(), "logged in");
        Ok(())
    }

    /// Clear the flag
    pub fn logout(&self) -> Result<()> {
        self.store.remove(slots::AUTHENTICATED)?;
        self.store.remove(slots::USER_EMAIL)?;
        info!("logged out");
        Ok(())
    }
}
