//! Booking records
//!
//! Bookings are an append-only list kept in the `bookings` slot of a
//! [`KeyValueStore`]. The only mutation an existing record ever sees is its
//! status flipping from ongoing to completed.

use crate::constants::slots;
use crate::error::{Error, Result};
use crate::fare::RideQuote;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Lifecycle of a booked ride
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Ongoing,
    Completed,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A confirmed, paid ride
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// Pickup text as entered (or the clicked coordinate label)
    pub pickup: String,

    /// Drop text as entered (or the clicked coordinate label)
    pub drop: String,

    /// The quote the rider paid for
    pub ride: RideQuote,

    /// Routed distance, absent if routing never succeeded
    #[serde(default)]
    pub distance_km: Option<f64>,

    pub created_at: DateTime<Utc>,

    /// Records written before statuses existed read back as ongoing
    #[serde(default)]
    pub status: BookingStatus,
}

impl BookingRecord {
    /// New ongoing booking stamped with the current time
    pub fn new(
        pickup: impl Into<String>,
        drop: impl Into<String>,
        ride: RideQuote,
        distance_km: Option<f64>,
    ) -> Self {
        Self {
            pickup: pickup.into(),
            drop: drop.into(),
            ride,
            distance_km,
            created_at: Utc::now(),
            status: BookingStatus::Ongoing,
        }
    }
}

/// Booking list persisted in a key-value slot
#[derive(Debug, Clone)]
pub struct BookingStore {
    store: Arc<dyn KeyValueStore>,
}

impl BookingStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All bookings, oldest first
    pub fn list(&self) -> Result<Vec<BookingRecord>> {
        match self.store.get(slots::BOOKINGS)? {
            Some(content) if !content.trim().is_empty() => {
                serde_json::from_str(&content).map_err(|e| {
                    Error::Storage(format!("Failed to parse bookings: {}", e))
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Number of stored bookings
    pub fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Add a booking to the end of the list
    pub fn append(&self, record: BookingRecord) -> Result<()> {
        let mut records = self.list()?;
        records.push(record);
        self.save(&records)?;
        info!(count = records.len(), "booking stored");
        Ok(())
    }

    /// Mark the booking at `index` as completed and return it
    pub fn mark_completed(&self, index: usize) -> Result<BookingRecord> {
        let mut records = self.list()?;
        let len = records.len();
        let record = records
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        record.status = BookingStatus::Completed;
        let updated = record.clone();

        self.save(&records)?;
        info!(index, "booking completed");
        Ok(updated)
    }

    fn save(&self, records: &[BookingRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records).map_err(|e| {
            Error::Storage(format!("Failed to serialize bookings: {}", e))
        })?;
        self.store.set(slots::BOOKINGS, &content)
    }
}
