use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled train trip between two stations. Immutable reference data.
///
/// Invariant: `arrival_time > departure_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub origin: Uuid,
    pub destination: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub operator: String,
    pub price: Decimal,
    pub bicycles_allowed: bool,
    pub dogs_allowed: bool,
}

impl Trip {
    pub fn schedule_is_valid(&self) -> bool {
        self.arrival_time > self.departure_time
    }
}

/// A trip joined with its origin and destination stations, for views that
/// denormalize the station details (e.g. a booking's trip summary).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripDetail {
    pub trip: Trip,
    pub origin: crate::station::Station,
    pub destination: crate::station::Station,
}
