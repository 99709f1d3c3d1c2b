//! Ride session
//!
//! [`RideSession`] owns one booking attempt: the pickup and drop selections,
//! the current route estimate and quotes, the chosen ride class, and the
//! booking handshake (login check, payment, persisted record).
//!
//! ```text
//! Empty -> PickupSet -> Estimating -> Ready -> QuoteSelected
//!       -> AwaitingAuth -> AwaitingPayment -> Booked
//! ```
//!
//! Route requests go out as [`EstimateTicket`]s. Only the most recently
//! issued ticket may update the session; older answers are dropped.
//!
//! The `*_deferred` entry points return the ticket instead of awaiting the
//! route, so a caller sharing the session can unlock it while the request
//! runs through a [`RouteEstimator`] and re-lock for [`RideSession::apply_estimate`].

pub mod map;
pub mod view;

use crate::auth::AuthGate;
use crate::booking::{BookingRecord, BookingStore};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fare::{compute_quotes, placeholder_quotes, RideClass, RideQuote};
use crate::geo::resolver::LocationResolver;
use crate::geo::{Bounds, Coordinates, GeoBackend};
use crate::payment::{PaymentGateway, PaymentOutcome};
use crate::route::{RouteBackend, RouteEstimate};
use crate::storage::KeyValueStore;
use map::{MapView, Marker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Which end of the ride a location belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Pickup,
    Drop,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pickup => write!(f, "pickup"),
            Self::Drop => write!(f, "drop"),
        }
    }
}

/// Which slot the next map click fills
///
/// The first click fills pickup, the next fills drop, later clicks do
/// nothing until the session is reset. Text entry can fill either slot in
/// any order, which is why `WaitingForPickup` remembers whether the drop is
/// already known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotFill {
    WaitingForPickup { drop_filled: bool },
    WaitingForDrop,
    BothFilled,
}

impl Default for SlotFill {
    fn default() -> Self {
        Self::WaitingForPickup { drop_filled: false }
    }
}

impl SlotFill {
    /// Slot a click would fill, if any
    pub fn click_target(self) -> Option<Slot> {
        match self {
            Self::WaitingForPickup { .. } => Some(Slot::Pickup),
            Self::WaitingForDrop => Some(Slot::Drop),
            Self::BothFilled => None,
        }
    }

    /// State after `slot` received a coordinate
    pub fn record(self, slot: Slot) -> Self {
        match (self, slot) {
            (Self::WaitingForPickup { drop_filled: false }, Slot::Pickup) => Self::WaitingForDrop,
            (Self::WaitingForPickup { drop_filled: true }, Slot::Pickup) => Self::BothFilled,
            (Self::WaitingForPickup { .. }, Slot::Drop) => Self::WaitingForPickup { drop_filled: true },
            (Self::WaitingForDrop, Slot::Pickup) => Self::WaitingForDrop,
            (Self::WaitingForDrop, Slot::Drop) => Self::BothFilled,
            (Self::BothFilled, _) => Self::BothFilled,
        }
    }
}

/// Where a session is in the booking flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Empty,
    PickupSet,
    Estimating,
    Ready,
    QuoteSelected,
    AwaitingAuth,
    AwaitingPayment,
    Booked,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::PickupSet => "pickup_set",
            Self::Estimating => "estimating",
            Self::Ready => "ready",
            Self::QuoteSelected => "quote_selected",
            Self::AwaitingAuth => "awaiting_auth",
            Self::AwaitingPayment => "awaiting_payment",
            Self::Booked => "booked",
        };
        write!(f, "{}", name)
    }
}

/// Text and resolved coordinate for one end of the ride
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSelection {
    pub raw_text: String,
    pub coords: Option<Coordinates>,
}

/// What the caller must do next after requesting a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum BookingStep {
    /// Send the rider through login, then request again
    LoginRequired,
    /// Open the payment step for this amount
    Payment { amount: String },
}

/// Handle for one in-flight route request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateTicket {
    seq: u64,
    pub pickup: Coordinates,
    pub drop: Coordinates,
}

impl EstimateTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// A location change whose route estimate has not run yet
#[derive(Debug)]
#[must_use]
pub struct Pending<T> {
    pub value: T,
    /// Route request to run, when the change needs one
    pub ticket: Option<EstimateTicket>,
}

impl<T> Pending<T> {
    fn settled(value: T) -> Self {
        Self {
            value,
            ticket: None,
        }
    }
}

/// Runs route requests without borrowing the session
#[derive(Debug)]
pub struct RouteEstimator<R> {
    router: Arc<R>,
    timeout: Duration,
}

impl<R: RouteBackend> RouteEstimator<R> {
    /// Route the ticket's locations; no answer in time is `RouteUnavailable`
    pub async fn estimate(&self, ticket: &EstimateTicket) -> Result<RouteEstimate> {
        match tokio::time::timeout(self.timeout, self.router.route(ticket.pickup, ticket.drop)).await {
            Ok(result) => result,
            Err(_) => Err(Error::RouteUnavailable(format!(
                "no answer within {}s",
                self.timeout.as_secs_f64()
            ))),
        }
    }
}

/// Serializable view of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub state: SessionState,
    pub pickup: LocationSelection,
    pub drop: LocationSelection,
    pub next_click: Option<Slot>,
    pub distance_km: Option<f64>,
    pub quotes: Vec<RideQuote>,
    pub selected: Option<RideClass>,
    pub loading: bool,
    pub map: MapView,
    pub last_booking: Option<BookingRecord>,
}

/// One booking attempt, from empty inputs to a stored record
#[derive(Debug)]
pub struct RideSession<G, R> {
    id: Uuid,
    resolver: LocationResolver<G>,
    router: Arc<R>,
    bookings: BookingStore,
    auth: AuthGate,
    route_timeout: Duration,
    home: Coordinates,

    pickup: LocationSelection,
    drop: LocationSelection,
    fill: SlotFill,
    state: SessionState,
    center: Coordinates,
    estimate: Option<RouteEstimate>,
    estimated_for: Option<(Coordinates, Coordinates)>,
    quotes: Vec<RideQuote>,
    selected: Option<RideClass>,
    loading: bool,
    issued_seq: u64,
    last_booking: Option<BookingRecord>,
}

impl<G: GeoBackend, R: RouteBackend> RideSession<G, R> {
    /// New empty session
    ///
    /// Bookings and the login flag are both read from `store`.
    pub fn new(resolver: LocationResolver<G>, router: R, store: Arc<dyn KeyValueStore>) -> Self {
        let home = crate::config::RegionConfig::default().center();
        Self {
            id: Uuid::new_v4(),
            resolver,
            router: Arc::new(router),
            bookings: BookingStore::new(store.clone()),
            auth: AuthGate::new(store),
            route_timeout: DEFAULT_ROUTE_TIMEOUT,
            home,
            pickup: LocationSelection::default(),
            drop: LocationSelection::default(),
            fill: SlotFill::default(),
            state: SessionState::Empty,
            center: home,
            estimate: None,
            estimated_for: None,
            quotes: placeholder_quotes(),
            selected: None,
            loading: false,
            issued_seq: 0,
            last_booking: None,
        }
    }

    /// Session wired from the config's region, geocoding and routing settings
    pub fn from_config(
        config: &Config,
        geocoder: G,
        router: R,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let resolver = LocationResolver::new(
            geocoder,
            config.region.bounds(),
            config.geocoding.min_query_chars,
        );
        Self::new(resolver, router, store)
            .with_route_timeout(config.routing.timeout())
            .with_home(config.region.center())
    }

    pub fn with_route_timeout(mut self, timeout: Duration) -> Self {
        self.route_timeout = timeout;
        self
    }

    /// Map center used before any location is chosen
    pub fn with_home(mut self, home: Coordinates) -> Self {
        self.home = home;
        self.center = home;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Region the session accepts locations in
    pub fn bounds(&self) -> &Bounds {
        self.resolver.bounds()
    }

    pub fn pickup(&self) -> &LocationSelection {
        &self.pickup
    }

    pub fn drop_location(&self) -> &LocationSelection {
        &self.drop
    }

    pub fn slot_fill(&self) -> SlotFill {
        self.fill
    }

    pub fn quotes(&self) -> &[RideQuote] {
        &self.quotes
    }

    pub fn selected(&self) -> Option<RideClass> {
        self.selected
    }

    /// Quote for the selected class from the current quote set
    pub fn selected_quote(&self) -> Option<&RideQuote> {
        let class = self.selected?;
        self.quotes.iter().find(|q| q.class == class)
    }

    pub fn estimate(&self) -> Option<&RouteEstimate> {
        self.estimate.as_ref()
    }

    pub fn distance_km(&self) -> Option<f64> {
        self.estimate.as_ref().map(|e| e.distance_km)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Handle for running this session's route requests
    pub fn estimator(&self) -> RouteEstimator<R> {
        RouteEstimator {
            router: self.router.clone(),
            timeout: self.route_timeout,
        }
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.bookings
    }

    pub fn last_booking(&self) -> Option<&BookingRecord> {
        self.last_booking.as_ref()
    }

    /// What the map should currently show
    pub fn map_view(&self) -> MapView {
        let mut markers = Vec::new();
        if let Some(coords) = self.pickup.coords {
            markers.push(Marker {
                coords,
                label: "Pickup Location".to_string(),
            });
        }
        if let Some(coords) = self.drop.coords {
            markers.push(Marker {
                coords,
                label: "Drop Location".to_string(),
            });
        }

        MapView {
            center: self.center,
            markers,
            polyline: self.estimate.as_ref().map(|e| e.path.clone()),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            state: self.state,
            pickup: self.pickup.clone(),
            drop: self.drop.clone(),
            next_click: self.fill.click_target(),
            distance_km: self.distance_km(),
            quotes: self.quotes.clone(),
            selected: self.selected,
            loading: self.loading,
            map: self.map_view(),
            last_booking: self.last_booking.clone(),
        }
    }

    /// Update a slot's text and geocode it once it is long enough
    ///
    /// Returns the resolved coordinate, or `None` when the text was too short
    /// or nothing matched. Out-of-region matches are returned as
    /// `OutOfBounds` and leave the slot as it was, text included.
    pub async fn enter_text(&mut self, slot: Slot, text: &str) -> Result<Option<Coordinates>> {
        let pending = self.locate_text(slot, text, true).await?;
        Ok(self.settle(pending).await)
    }

    /// Like [`enter_text`](Self::enter_text) but geocodes any non-blank text
    ///
    /// For one-shot input, where there is no typing to debounce.
    pub async fn enter_text_now(&mut self, slot: Slot, text: &str) -> Result<Option<Coordinates>> {
        let pending = self.locate_text(slot, text, false).await?;
        Ok(self.settle(pending).await)
    }

    /// [`enter_text`](Self::enter_text) without running the route request
    pub async fn enter_text_deferred(
        &mut self,
        slot: Slot,
        text: &str,
    ) -> Result<Pending<Option<Coordinates>>> {
        self.locate_text(slot, text, true).await
    }

    /// Apply a map click to the next open slot
    ///
    /// Returns the slot that was filled, or `None` once both are filled.
    pub async fn click_map(&mut self, coords: Coordinates) -> Result<Option<Slot>> {
        let pending = self.click_map_deferred(coords)?;
        Ok(self.settle(pending).await)
    }

    /// [`click_map`](Self::click_map) without running the route request
    pub fn click_map_deferred(&mut self, coords: Coordinates) -> Result<Pending<Option<Slot>>> {
        self.ensure_editable()?;
        let coords = self.resolver.resolve_by_click(coords).map_err(|e| {
            warn!(lat = coords.lat, lng = coords.lng, "click outside region");
            e
        })?;

        let Some(slot) = self.fill.click_target() else {
            debug!("both locations already chosen, ignoring click");
            return Ok(Pending::settled(None));
        };

        self.selection_mut(slot).raw_text = coords.label();
        let ticket = self.place(slot, coords);
        Ok(Pending {
            value: Some(slot),
            ticket,
        })
    }

    /// Issue a route request for the current pickup and drop
    ///
    /// Returns `None` unless both coordinates are known. Issuing a ticket
    /// makes every earlier ticket stale.
    pub fn begin_estimate(&mut self) -> Option<EstimateTicket> {
        let pickup = self.pickup.coords?;
        let drop = self.drop.coords?;

        self.issued_seq += 1;
        self.loading = true;
        self.state = SessionState::Estimating;
        debug!(seq = self.issued_seq, "route estimate issued");

        Some(EstimateTicket {
            seq: self.issued_seq,
            pickup,
            drop,
        })
    }

    /// Apply a routing answer
    ///
    /// Returns false when the ticket was stale and the answer was dropped.
    /// A failed answer keeps the previous distance and quotes.
    pub fn apply_estimate(&mut self, ticket: EstimateTicket, result: Result<RouteEstimate>) -> bool {
        if ticket.seq != self.issued_seq {
            debug!(seq = ticket.seq, latest = self.issued_seq, "dropping stale route estimate");
            return false;
        }

        self.loading = false;
        match result {
            Ok(estimate) => {
                info!(distance_km = estimate.distance_km, "route estimated");
                self.quotes = compute_quotes(estimate.distance_km);
                self.estimated_for = Some((ticket.pickup, ticket.drop));
                self.estimate = Some(estimate);
            }
            Err(e) => {
                warn!(error = %e, "route estimation failed, keeping previous quotes");
            }
        }

        self.state = if self.selected.is_some() {
            SessionState::QuoteSelected
        } else {
            SessionState::Ready
        };
        true
    }

    /// Re-run routing for the current locations, e.g. after a failure
    pub async fn refresh_estimate(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        let ticket = self.begin_estimate();
        let issued = ticket.is_some();
        self.settle(Pending { value: (), ticket }).await;
        Ok(issued)
    }

    /// Choose a ride class
    ///
    /// The choice survives later re-estimates since class ids never change.
    pub fn select_ride(&mut self, class: RideClass) -> Result<()> {
        if matches!(self.state, SessionState::AwaitingPayment | SessionState::Booked) {
            return Err(Error::InvalidState(format!(
                "cannot change ride while {}",
                self.state
            )));
        }

        self.selected = Some(class);
        if matches!(
            self.state,
            SessionState::Ready | SessionState::QuoteSelected | SessionState::AwaitingAuth
        ) {
            self.state = SessionState::QuoteSelected;
        }
        Ok(())
    }

    /// Ask to book the selected ride
    ///
    /// Both location texts must be non-empty; coordinates alone do not
    /// count. The login flag is read here and nowhere else.
    pub fn request_booking(&mut self) -> Result<BookingStep> {
        if self.pickup.raw_text.trim().is_empty() || self.drop.raw_text.trim().is_empty() {
            return Err(Error::MissingFields);
        }

        let amount = self
            .selected_quote()
            .map(|q| q.price.clone())
            .ok_or(Error::NoRideSelected)?;

        if !matches!(
            self.state,
            SessionState::QuoteSelected | SessionState::AwaitingAuth
        ) {
            return Err(Error::InvalidState(format!("cannot book while {}", self.state)));
        }

        if !self.auth.is_authenticated() {
            info!(session = %self.id, "login required before booking");
            self.state = SessionState::AwaitingAuth;
            return Ok(BookingStep::LoginRequired);
        }

        self.state = SessionState::AwaitingPayment;
        Ok(BookingStep::Payment { amount })
    }

    /// Feed the payment step's answer back into the session
    ///
    /// On success the booking is stored and returned. A store failure is
    /// returned as an error and the session stays awaiting payment.
    pub fn complete_payment(&mut self, outcome: PaymentOutcome) -> Result<Option<BookingRecord>> {
        if self.state != SessionState::AwaitingPayment {
            return Err(Error::InvalidState(format!(
                "no payment pending while {}",
                self.state
            )));
        }

        match outcome {
            PaymentOutcome::Cancelled => {
                info!(session = %self.id, "payment cancelled");
                self.state = SessionState::QuoteSelected;
                Ok(None)
            }
            PaymentOutcome::Succeeded => {
                let ride = self.selected_quote().cloned().ok_or(Error::NoRideSelected)?;
                let record = BookingRecord::new(
                    self.pickup.raw_text.clone(),
                    self.drop.raw_text.clone(),
                    ride,
                    self.distance_km(),
                );

                self.bookings.append(record.clone())?;
                info!(session = %self.id, price = %record.ride.price, "ride booked");

                self.state = SessionState::Booked;
                self.last_booking = Some(record.clone());
                Ok(Some(record))
            }
        }
    }

    /// Run the payment step through a gateway
    pub async fn pay<P: PaymentGateway>(&mut self, gateway: &P) -> Result<Option<BookingRecord>> {
        if self.state != SessionState::AwaitingPayment {
            return Err(Error::InvalidState(format!(
                "no payment pending while {}",
                self.state
            )));
        }

        let amount = self
            .selected_quote()
            .map(|q| q.price.clone())
            .ok_or(Error::NoRideSelected)?;
        let outcome = gateway.charge(&amount).await?;
        self.complete_payment(outcome)
    }

    /// Start over with a fresh, empty session
    pub fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.pickup = LocationSelection::default();
        self.drop = LocationSelection::default();
        self.fill = SlotFill::default();
        self.state = SessionState::Empty;
        self.center = self.home;
        self.estimate = None;
        self.estimated_for = None;
        self.quotes = placeholder_quotes();
        self.selected = None;
        self.loading = false;
        // outstanding tickets must not land in the new session
        self.issued_seq += 1;
        self.last_booking = None;
        debug!(session = %self.id, "session reset");
    }

    fn ensure_editable(&self) -> Result<()> {
        match self.state {
            SessionState::AwaitingPayment | SessionState::Booked => Err(Error::InvalidState(
                format!("cannot change locations while {}", self.state),
            )),
            _ => Ok(()),
        }
    }

    fn selection_mut(&mut self, slot: Slot) -> &mut LocationSelection {
        match slot {
            Slot::Pickup => &mut self.pickup,
            Slot::Drop => &mut self.drop,
        }
    }

    async fn locate_text(
        &mut self,
        slot: Slot,
        text: &str,
        gated: bool,
    ) -> Result<Pending<Option<Coordinates>>> {
        self.ensure_editable()?;
        let previous = std::mem::replace(&mut self.selection_mut(slot).raw_text, text.to_string());

        if text.trim().is_empty() || (gated && !self.resolver.should_geocode(text)) {
            return Ok(Pending::settled(None));
        }

        match self.resolver.resolve_by_text(text).await {
            Ok(location) => {
                let coords = location.coords();
                let ticket = self.place(slot, coords);
                Ok(Pending {
                    value: Some(coords),
                    ticket,
                })
            }
            Err(Error::NotFound(query)) => {
                debug!(%slot, %query, "no geocoding match");
                Ok(Pending::settled(None))
            }
            Err(e) => {
                if matches!(e, Error::OutOfBounds { .. }) {
                    self.selection_mut(slot).raw_text = previous;
                }
                warn!(%slot, error = %e, "could not resolve location");
                Err(e)
            }
        }
    }

    /// Store a resolved coordinate and recenter
    ///
    /// Returns a ticket when both ends are known and differ from the last
    /// estimate.
    fn place(&mut self, slot: Slot, coords: Coordinates) -> Option<EstimateTicket> {
        self.selection_mut(slot).coords = Some(coords);
        self.fill = self.fill.record(slot);
        self.center = coords;

        match (self.pickup.coords, self.drop.coords) {
            (Some(pickup), Some(drop)) => {
                if !self.loading && self.estimated_for == Some((pickup, drop)) {
                    debug!("locations unchanged since last estimate");
                    return None;
                }
                self.begin_estimate()
            }
            (Some(_), None) if self.state == SessionState::Empty => {
                self.state = SessionState::PickupSet;
                None
            }
            _ => None,
        }
    }

    /// Run a pending route request in place
    async fn settle<T>(&mut self, pending: Pending<T>) -> T {
        if let Some(ticket) = pending.ticket {
            let result = self.estimator().estimate(&ticket).await;
            self.apply_estimate(ticket, result);
        }
        pending.value
    }
}
