use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::require_write_scope;
use crate::state::AppState;
use velaro_booking::{lifecycle, Booking, BookingStatus, CreateBookingRequest};
use velaro_catalog::TripDetail;
use velaro_core::identity::AuthenticatedUser;
use velaro_shared::pagination::{PageLinks, PageQuery};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub passenger_name: String,
    pub has_bicycle: bool,
    pub has_dog: bool,
    pub status: BookingStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Denormalized trip and station info, present on single-booking reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<TripDetail>,
    pub links: BookingLinks,
}

#[derive(Debug, Serialize)]
pub struct BookingLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

impl BookingResponse {
    fn from_booking(booking: Booking, public_url: &str, trip: Option<TripDetail>) -> Self {
        Self {
            links: BookingLinks {
                self_link: format!("{}/api/bookings/{}", public_url, booking.id),
            },
            id: booking.id,
            trip_id: booking.trip_id,
            passenger_name: booking.passenger_name,
            has_bicycle: booking.has_bicycle,
            has_dog: booking.has_dog,
            status: booking.status,
            expires_at: booking.expires_at,
            created_at: booking.created_at,
            trip,
        }
    }
}

#[derive(Debug, Serialize)]
struct BookingListResponse {
    data: Vec<BookingResponse>,
    links: PageLinks,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route(
            "/api/bookings/{booking_id}",
            get(get_booking).delete(cancel_booking),
        )
}

pub(crate) fn parse_booking_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation("Invalid booking ID format".to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/bookings
/// List the caller's bookings, newest first.
async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.validate()?;

    let (bookings, total) = state.bookings.list_bookings(user.id, &page).await?;

    let data = bookings
        .into_iter()
        .map(|booking| BookingResponse::from_booking(booking, &state.public_url, None))
        .collect();

    let base_url = format!("{}/api/bookings", state.public_url);
    let links = PageLinks::build(&base_url, &page, total);

    Ok((
        [(header::CACHE_CONTROL, "no-cache")],
        Json(BookingListResponse { data, links }),
    ))
}

/// POST /api/bookings
/// Place a hold on a trip. The booking stays pending until paid and expires
/// one hold window after creation.
async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_write_scope(&user)?;

    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    if req.passenger_name.trim().is_empty() {
        return Err(ApiError::Validation("passenger_name must not be empty".to_string()));
    }

    // 1. The trip must exist
    let trip = state
        .trips
        .get_trip(req.trip_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Trip not found".to_string()))?;

    // 2. Bicycles/dogs only where the trip allows them
    lifecycle::check_trip_rules(&trip, req.has_bicycle, req.has_dog)?;

    // 3. Create the pending booking with its hold window
    let booking = Booking::new(
        req.trip_id,
        user.id,
        req.passenger_name,
        req.has_bicycle,
        req.has_dog,
        Duration::seconds(state.booking_hold_seconds as i64),
    );
    state.bookings.create_booking(&booking).await?;

    tracing::info!(booking_id = %booking.id, trip_id = %booking.trip_id, "booking created");

    Ok((
        StatusCode::CREATED,
        [(header::CACHE_CONTROL, "no-cache")],
        Json(BookingResponse::from_booking(booking, &state.public_url, None)),
    ))
}

/// GET /api/bookings/{booking_id}
/// Fetch one booking with denormalized trip and station info. Owner only.
async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let booking_id = parse_booking_id(&booking_id)?;

    let booking = state
        .bookings
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if !booking.is_owned_by(user.id) {
        return Err(ApiError::Forbidden("Access denied to this booking".to_string()));
    }

    let trip = state.trips.get_trip_detail(booking.trip_id).await?;

    Ok((
        [(header::CACHE_CONTROL, "no-cache")],
        Json(BookingResponse::from_booking(booking, &state.public_url, trip)),
    ))
}

/// DELETE /api/bookings/{booking_id}
/// Cancel a booking. Confirmed bookings are not cancellable through this
/// path.
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_write_scope(&user)?;

    let booking_id = parse_booking_id(&booking_id)?;

    let booking = state
        .bookings
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if !booking.is_owned_by(user.id) {
        return Err(ApiError::Forbidden("Access denied to this booking".to_string()));
    }

    lifecycle::ensure_cancellable(&booking)?;

    state.bookings.delete_booking(booking_id).await?;

    tracing::info!(booking_id = %booking_id, "booking cancelled");

    Ok(StatusCode::NO_CONTENT)
}
