use std::sync::Arc;
use velaro_core::repository::{
    BookingRepository, PaymentRepository, StationRepository, TripRepository, UserRepository,
};
use velaro_payment::PaymentProcessor;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub stations: Arc<dyn StationRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub processor: Arc<dyn PaymentProcessor>,
    pub auth: AuthConfig,
    /// Seconds a pending booking holds its seat before payment must land.
    pub booking_hold_seconds: u64,
    /// Base URL for the links sections of responses.
    pub public_url: String,
}
