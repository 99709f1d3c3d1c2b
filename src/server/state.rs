//! Server shared state
//!
//! Holds configuration, the shared store and the one interactive session.

use crate::auth::AuthGate;
use crate::booking::BookingStore;
use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimBackend;
use crate::geo::{get_geocoder, GeoBackend};
use crate::route::osrm::OsrmBackend;
use crate::route::{get_router, RouteBackend};
use crate::session::map::MapWidget;
use crate::session::view::SessionView;
use crate::session::{EstimateTicket, RideSession, SessionSnapshot};
use crate::storage::{FileStore, KeyValueStore};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard};

/// Shared state for the HTTP server
pub struct AppState<G, R> {
    /// Configuration
    pub config: Config,

    store: Arc<dyn KeyValueStore>,
    widget: MapWidget,
    view: Mutex<SessionView<G, R>>,
    started: Instant,
}

impl<G: GeoBackend, R: RouteBackend> AppState<G, R> {
    /// Create new application state around the given backends
    pub fn new(config: Config, geocoder: G, router: R, store: Arc<dyn KeyValueStore>) -> Self {
        let widget = MapWidget::new();
        let session = RideSession::from_config(&config, geocoder, router, store.clone());
        let view = SessionView::activate(session, &widget);

        Self {
            config,
            store,
            widget,
            view: Mutex::new(view),
            started: Instant::now(),
        }
    }

    /// The active session view
    ///
    /// Do not hold the guard across a route request; use [`settle`](Self::settle).
    pub async fn view(&self) -> MutexGuard<'_, SessionView<G, R>> {
        self.view.lock().await
    }

    /// Run a route request with the session unlocked, then apply the answer
    ///
    /// Other requests see the session as estimating meanwhile. An answer
    /// whose ticket was superseded is dropped.
    pub async fn settle(&self, ticket: EstimateTicket) -> SessionSnapshot {
        let estimator = self.view().await.session().estimator();
        let result = estimator.estimate(&ticket).await;

        let mut view = self.view().await;
        view.session_mut().apply_estimate(ticket, result);
        view.session().snapshot()
    }

    /// Snapshot after a change, settling its route request if it has one
    pub async fn finish(&self, ticket: Option<EstimateTicket>) -> SessionSnapshot {
        match ticket {
            Some(ticket) => self.settle(ticket).await,
            None => self.view().await.session().snapshot(),
        }
    }

    /// Map widget feeding clicks into the session
    pub fn widget(&self) -> &MapWidget {
        &self.widget
    }

    pub fn bookings(&self) -> BookingStore {
        BookingStore::new(self.store.clone())
    }

    pub fn auth(&self) -> AuthGate {
        AuthGate::new(self.store.clone())
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

impl AppState<NominatimBackend, OsrmBackend> {
    /// State backed by the configured services and the data directory
    pub fn from_config(config: Config) -> Result<Self> {
        let store = FileStore::from_config(&config)?;
        let geocoder = get_geocoder(&config);
        let router = get_router(&config);
        Ok(Self::new(config, geocoder, router, Arc::new(store)))
    }
}
