//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::booking::BookingRecord;
use crate::error::Error;
use crate::fare::{compute_quotes, RideClass, RideQuote};
use crate::geo::{Bounds, Coordinates, GeoBackend};
use crate::payment::{PaymentOutcome, SimulatedPayment};
use crate::route::RouteBackend;
use crate::server::state::AppState;
use crate::session::{BookingStep, SessionSnapshot, Slot};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the API router
pub fn create_router<G, R>(state: Arc<AppState<G, R>>) -> Router
where
    G: GeoBackend + 'static,
    R: RouteBackend + 'static,
{
    Router::new()
        .route("/api/status", get(status_handler::<G, R>))
        .route("/api/session", get(session_handler::<G, R>))
        .route("/api/session/pickup", post(pickup_handler::<G, R>))
        .route("/api/session/drop", post(drop_handler::<G, R>))
        .route("/api/session/click", post(click_handler::<G, R>))
        .route("/api/session/select", post(select_handler::<G, R>))
        .route("/api/session/book", post(book_handler::<G, R>))
        .route("/api/session/payment", post(payment_handler::<G, R>))
        .route("/api/session/reset", post(reset_handler::<G, R>))
        .route("/api/quotes", get(quotes_handler))
        .route("/api/rides", get(rides_handler::<G, R>))
        .route("/api/rides/:index/complete", post(complete_ride_handler::<G, R>))
        .route("/api/login", post(login_handler::<G, R>))
        .route("/api/logout", post(logout_handler::<G, R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip, default = "bad_request")]
    status: StatusCode,
}

fn bad_request() -> StatusCode {
    StatusCode::BAD_REQUEST
}

impl ApiError {
    fn new(status: StatusCode, code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::OutOfBounds { .. } => (StatusCode::BAD_REQUEST, "OUT_OF_BOUNDS"),
            Error::MissingFields => (StatusCode::BAD_REQUEST, "MISSING_FIELDS"),
            Error::NoRideSelected => (StatusCode::BAD_REQUEST, "NO_RIDE_SELECTED"),
            Error::InvalidState(_) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
            Error::IndexOutOfRange { .. } => (StatusCode::NOT_FOUND, "INDEX_OUT_OF_RANGE"),
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            Error::Geo(_) => (StatusCode::BAD_GATEWAY, "GEOCODING_UNAVAILABLE"),
            Error::RouteUnavailable(_) => (StatusCode::BAD_GATEWAY, "ROUTE_UNAVAILABLE"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError::new(status, code, err.to_string())
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Serviceable region
    pub bounds: Bounds,
    /// Whether the demo user is logged in
    pub authenticated: bool,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        bounds: state.config.region.bounds(),
        authenticated: state.auth().is_authenticated(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Current session
///
/// GET /api/session
async fn session_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
) -> Json<SessionSnapshot> {
    Json(state.view().await.session().snapshot())
}

/// Text entry request body
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Response to a location change
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    /// Resolved coordinate, absent while the text is too short or unmatched
    pub coords: Option<Coordinates>,
    pub session: SessionSnapshot,
}

async fn enter_text<G: GeoBackend, R: RouteBackend>(
    state: &AppState<G, R>,
    slot: Slot,
    text: &str,
) -> ApiResult<LocationResponse> {
    let pending = {
        let mut view = state.view().await;
        view.session_mut().enter_text_deferred(slot, text).await?
    };

    Ok(Json(LocationResponse {
        coords: pending.value,
        session: state.finish(pending.ticket).await,
    }))
}

/// Enter pickup text
///
/// POST /api/session/pickup
async fn pickup_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
    Json(req): Json<TextRequest>,
) -> ApiResult<LocationResponse> {
    enter_text(&state, Slot::Pickup, &req.text).await
}

/// Enter drop text
///
/// POST /api/session/drop
async fn drop_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
    Json(req): Json<TextRequest>,
) -> ApiResult<LocationResponse> {
    enter_text(&state, Slot::Drop, &req.text).await
}

/// Map click request body
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Response to a map click
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickResponse {
    /// Slot the click filled; absent once both are chosen
    pub filled: Option<Slot>,
    pub session: SessionSnapshot,
}

/// Map click, delivered through the map widget
///
/// POST /api/session/click
async fn click_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
    Json(req): Json<ClickRequest>,
) -> ApiResult<ClickResponse> {
    let coords = Coordinates::new(req.lat, req.lng);
    let pending = {
        let mut view = state.view().await;
        if !view.session().bounds().contains(coords) {
            return Err(Error::OutOfBounds {
                lat: coords.lat,
                lng: coords.lng,
            }
            .into());
        }

        state.widget().emit_click(coords);
        view.pump_deferred()?
    };

    Ok(Json(ClickResponse {
        filled: pending.value.last().copied(),
        session: state.finish(pending.ticket).await,
    }))
}

/// Ride selection request body
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub class: RideClass,
}

/// Choose a ride class
///
/// POST /api/session/select
async fn select_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
    Json(req): Json<SelectRequest>,
) -> ApiResult<SessionSnapshot> {
    let mut view = state.view().await;
    view.session_mut().select_ride(req.class)?;
    Ok(Json(view.session().snapshot()))
}

/// Response to a booking request
#[derive(Debug, Serialize, Deserialize)]
pub struct BookResponse {
    pub next: BookingStep,
    pub session: SessionSnapshot,
}

/// Request a booking for the selected ride
///
/// POST /api/session/book
async fn book_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
) -> ApiResult<BookResponse> {
    let mut view = state.view().await;
    let next = view.session_mut().request_booking()?;

    Ok(Json(BookResponse {
        next,
        session: view.session().snapshot(),
    }))
}

/// Payment request body
///
/// Without an outcome the simulated gateway decides.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub outcome: Option<PaymentOutcome>,
}

/// Response to a payment signal
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// The stored booking, absent when the payment was cancelled
    pub booking: Option<BookingRecord>,
    pub session: SessionSnapshot,
}

/// Report the payment step's outcome
///
/// POST /api/session/payment
async fn payment_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
    Json(req): Json<PaymentRequest>,
) -> ApiResult<PaymentResponse> {
    let mut view = state.view().await;
    let session = view.session_mut();

    let booking = match req.outcome {
        Some(outcome) => session.complete_payment(outcome)?,
        None => {
            let gateway = SimulatedPayment::from_millis(state.config.payment.processing_delay_ms);
            session.pay(&gateway).await?
        }
    };

    Ok(Json(PaymentResponse {
        booking,
        session: session.snapshot(),
    }))
}

/// Start a new session
///
/// POST /api/session/reset
async fn reset_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
) -> Json<SessionSnapshot> {
    let mut view = state.view().await;
    view.session_mut().reset();
    Json(view.session().snapshot())
}

/// Quote query parameters
#[derive(Debug, Deserialize)]
pub struct QuotesQuery {
    pub distance_km: f64,
}

/// Quotes response
#[derive(Debug, Serialize, Deserialize)]
pub struct QuotesResponse {
    pub distance_km: f64,
    pub quotes: Vec<RideQuote>,
}

/// Fare table for a distance
///
/// GET /api/quotes?distance_km=
async fn quotes_handler(Query(query): Query<QuotesQuery>) -> ApiResult<QuotesResponse> {
    if !query.distance_km.is_finite() || query.distance_km < 0.0 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "INVALID_DISTANCE",
            "Distance must be a non-negative number",
        ));
    }

    Ok(Json(QuotesResponse {
        distance_km: query.distance_km,
        quotes: compute_quotes(query.distance_km),
    }))
}

/// Booked rides response
#[derive(Debug, Serialize, Deserialize)]
pub struct RidesResponse {
    pub rides: Vec<BookingRecord>,
    pub count: usize,
}

/// Booked rides, oldest first
///
/// GET /api/rides
async fn rides_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
) -> ApiResult<RidesResponse> {
    let rides = state.bookings().list()?;
    let count = rides.len();
    Ok(Json(RidesResponse { rides, count }))
}

/// Mark a ride completed
///
/// POST /api/rides/:index/complete
async fn complete_ride_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
    Path(index): Path<usize>,
) -> ApiResult<BookingRecord> {
    let ride = state.bookings().mark_completed(index)?;
    info!(index, "ride completed");
    Ok(Json(ride))
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login state response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub authenticated: bool,
    pub email: Option<String>,
}

/// Simulated login
///
/// POST /api/login
async fn login_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let auth = state.auth();
    auth.login(&req.email, &req.password, &state.config.auth)?;

    Ok(Json(AuthResponse {
        authenticated: true,
        email: auth.user_email()?,
    }))
}

/// Clear the login flag
///
/// POST /api/logout
async fn logout_handler<G: GeoBackend, R: RouteBackend>(
    State(state): State<Arc<AppState<G, R>>>,
) -> ApiResult<AuthResponse> {
    state.auth().logout()?;
    Ok(Json(AuthResponse {
        authenticated: false,
        email: None,
    }))
}
