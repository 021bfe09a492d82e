use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Booking status in the lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

/// A seat hold on a trip, owned by a user. Pending until paid, with a fixed
/// expiry window set at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub user_id: Uuid,
    pub passenger_name: String,
    pub has_bicycle: bool,
    pub has_dog: bool,
    pub status: BookingStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /api/bookings.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub trip_id: Uuid,
    pub passenger_name: String,
    #[serde(default)]
    pub has_bicycle: bool,
    #[serde(default)]
    pub has_dog: bool,
}

impl Booking {
    /// Create a pending booking whose hold expires `hold` after creation.
    pub fn new(
        trip_id: Uuid,
        user_id: Uuid,
        passenger_name: String,
        has_bicycle: bool,
        has_dog: bool,
        hold: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            trip_id,
            user_id,
            passenger_name,
            has_bicycle,
            has_dog,
            status: BookingStatus::Pending,
            expires_at: now + hold,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_booking_is_pending_and_expires_after_the_hold() {
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Ada Lovelace".to_string(),
            false,
            false,
            Duration::hours(1),
        );

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.expires_at - booking.created_at, Duration::hours(1));
        assert!(!booking.is_expired(booking.created_at));
        assert!(!booking.is_expired(booking.expires_at));
        assert!(booking.is_expired(booking.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [BookingStatus::Pending, BookingStatus::Confirmed, BookingStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("paid".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&BookingStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!(serde_json::to_string(&BookingStatus::Confirmed).unwrap(), "\"confirmed\"");
    }
}
