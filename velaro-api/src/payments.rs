use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::header,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::bookings::parse_booking_id;
use crate::error::ApiError;
use crate::state::AppState;
use velaro_booking::lifecycle;
use velaro_core::identity::AuthenticatedUser;
use velaro_payment::{reconcile, CreatePaymentRequest, MaskedSource, Payment, PaymentStatus};

#[derive(Debug, Serialize)]
struct PaymentResponse {
    id: Uuid,
    amount: Decimal,
    currency: String,
    source: MaskedSource,
    status: PaymentStatus,
    links: PaymentLinks,
}

#[derive(Debug, Serialize)]
struct PaymentLinks {
    booking: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/bookings/{booking_id}/payment", post(submit_payment))
}

/// POST /api/bookings/{booking_id}/payment
/// Reconcile a payment against a pending booking: the amount must match the
/// trip price exactly, the hold must not have lapsed, and at most one
/// succeeded payment may ever exist. Payment and booking status settle in one
/// transaction.
async fn submit_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(booking_id): Path<String>,
    payload: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Validate the booking id format before any lookup
    let booking_id = parse_booking_id(&booking_id)?;

    // 2. Validate the payload: amount, currency allow-list, instrument rules
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    req.validate(Utc::now().year())?;

    // 3. Load the booking
    let booking = state
        .bookings
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    // 4. Only the owner may pay
    if !booking.is_owned_by(user.id) {
        return Err(ApiError::Forbidden("Access denied to this booking".to_string()));
    }

    // 5. A booking with a succeeded payment is immutable to further attempts
    let already_paid = state.payments.booking_has_succeeded_payment(booking_id).await?;
    reconcile::ensure_not_already_paid(already_paid)?;

    // 6. The hold must still be live (expiry is enforced here, lazily)
    lifecycle::ensure_payable(&booking, Utc::now())?;

    // 7. The amount must equal the trip price exactly
    let trip = state
        .trips
        .get_trip(booking.trip_id)
        .await?
        .ok_or_else(|| {
            ApiError::Internal(anyhow::anyhow!("booking {} references a missing trip", booking_id))
        })?;
    reconcile::ensure_amount_matches(req.amount, trip.price)?;

    // 8. Persist the pending payment with the masked instrument
    let payment = Payment::new(booking_id, req.amount, req.currency.clone(), req.source.mask());
    state.payments.create_payment(&payment).await?;

    // 9. Charge through the processor capability. A processor error (not a
    // decline) aborts here: the payment row stays pending and the booking is
    // untouched.
    let approved = state
        .processor
        .charge(&req.source, req.amount, &req.currency)
        .await?;

    // 10. Settle payment + booking atomically; the store re-checks the hold
    // under a row lock before confirming.
    let final_status = state
        .payments
        .settle_payment(payment.id, booking_id, approved)
        .await?;

    tracing::info!(
        payment_id = %payment.id,
        booking_id = %booking_id,
        status = %final_status,
        "payment settled"
    );

    // 11. Respond with the masked record and a link back to the booking
    Ok((
        [(header::CACHE_CONTROL, "no-cache")],
        Json(PaymentResponse {
            id: payment.id,
            amount: payment.amount,
            currency: payment.currency,
            source: payment.source,
            status: final_status,
            links: PaymentLinks {
                booking: format!("{}/api/bookings/{}", state.public_url, booking_id),
            },
        }),
    ))
}
