//! Test doubles for the network backends

use crate::error::{Error, Result};
use crate::geo::{Coordinates, GeoBackend, GeoLocation};
use crate::route::{RouteBackend, RouteEstimate};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

/// Geocoder answering from a fixed table
#[derive(Debug, Clone, Default)]
pub struct StubGeocoder {
    places: HashMap<String, Coordinates>,
    fail: bool,
}

impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            places: HashMap::new(),
            fail: true,
        }
    }

    pub fn with(mut self, query: &str, lat: f64, lng: f64) -> Self {
        self.places.insert(query.to_string(), Coordinates::new(lat, lng));
        self
    }
}

impl GeoBackend for StubGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoLocation>> {
        if self.fail {
            return Err(Error::Geo("stub geocoder offline".to_string()));
        }
        Ok(self.places.get(query).map(|c| GeoLocation {
            lat: c.lat,
            lng: c.lng,
            display_name: query.to_string(),
        }))
    }
}

/// Router returning a configurable distance, or failing
///
/// Clones share the distance so a test can change it after handing the
/// router to a session.
#[derive(Debug, Clone)]
pub struct StubRouter {
    distance_km: Arc<Mutex<Option<f64>>>,
    calls: Arc<AtomicUsize>,
}

impl StubRouter {
    pub fn with_distance(distance_km: f64) -> Self {
        Self {
            distance_km: Arc::new(Mutex::new(Some(distance_km))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            distance_km: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_distance(&self, distance_km: Option<f64>) {
        *self.distance_km.lock().unwrap() = distance_km;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteBackend for StubRouter {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteEstimate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let distance_km = *self.distance_km.lock().unwrap();
        match distance_km {
            Some(distance_km) => Ok(RouteEstimate {
                distance_km,
                path: vec![from, to],
            }),
            None => Err(Error::RouteUnavailable("stub router has no route".to_string())),
        }
    }
}

/// Router that never answers in time
#[derive(Debug, Clone, Default)]
pub struct HangingRouter;

impl RouteBackend for HangingRouter {
    async fn route(&self, _from: Coordinates, _to: Coordinates) -> Result<RouteEstimate> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(Error::RouteUnavailable("unreachable".to_string()))
    }
}

/// Router that holds every request until the test releases it
///
/// Requests are released in arrival order. Each released request answers
/// with the next queued distance.
#[derive(Debug, Clone)]
pub struct GatedRouter {
    gate: Arc<Semaphore>,
    distances: Arc<Mutex<VecDeque<f64>>>,
    calls: Arc<AtomicUsize>,
}

impl GatedRouter {
    pub fn new(distances: &[f64]) -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
            distances: Arc::new(Mutex::new(distances.iter().copied().collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Let the oldest waiting request through
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until `n` requests have arrived
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("route requests never arrived");
    }
}

impl RouteBackend for GatedRouter {
    async fn route(&self, from: Coordinates, to: Coordinates) -> Result<RouteEstimate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| Error::RouteUnavailable(e.to_string()))?;
        permit.forget();

        let distance_km = self
            .distances
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::RouteUnavailable("no distance queued".to_string()))?;
        Ok(RouteEstimate {
            distance_km,
            path: vec![from, to],
        })
    }
}
