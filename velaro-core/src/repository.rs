use crate::identity::User;
use async_trait::async_trait;
use uuid::Uuid;
use velaro_booking::Booking;
use velaro_catalog::{Station, StationFilter, Trip, TripDetail, TripFilter};
use velaro_payment::{Payment, PaymentStatus};
use velaro_shared::pagination::Page;

/// Repository trait for station reference data
#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Returns the requested page and the total row count for the filter.
    async fn list_stations(
        &self,
        filter: &StationFilter,
        page: &Page,
    ) -> Result<(Vec<Station>, i64), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for trip reference data
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn search_trips(
        &self,
        filter: &TripFilter,
        page: &Page,
    ) -> Result<(Vec<Trip>, i64), Box<dyn std::error::Error + Send + Sync>>;

    async fn get_trip(
        &self,
        id: Uuid,
    ) -> Result<Option<Trip>, Box<dyn std::error::Error + Send + Sync>>;

    /// Trip joined with both stations, for denormalized booking views.
    async fn get_trip_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<TripDetail>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for bookings
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>>;

    /// The owner's bookings, newest first.
    async fn list_bookings(
        &self,
        user_id: Uuid,
        page: &Page,
    ) -> Result<(Vec<Booking>, i64), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_booking(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for payments
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create_payment(
        &self,
        payment: &Payment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn booking_has_succeeded_payment(
        &self,
        booking_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Settle the payment and, on success, confirm the booking in one
    /// transaction. The booking must still be pending and unexpired at
    /// commit time; if that re-check fails the payment is recorded as
    /// failed and the booking is left untouched. Returns the final
    /// payment status.
    async fn settle_payment(
        &self,
        payment_id: Uuid,
        booking_id: Uuid,
        succeeded: bool,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        user: &User,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
