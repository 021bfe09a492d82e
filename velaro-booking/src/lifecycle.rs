use crate::model::{Booking, BookingStatus};
use chrono::{DateTime, Utc};
use velaro_catalog::Trip;

/// Booking lifecycle rule violations.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Bicycles are not allowed on this trip")]
    BicyclesNotAllowed,

    #[error("Dogs are not allowed on this trip")]
    DogsNotAllowed,

    #[error("Cannot cancel a confirmed booking")]
    NotCancellable,

    #[error("Booking has expired")]
    HoldExpired,

    #[error("Booking is not pending")]
    NotPending,
}

/// A booking may only carry a bicycle or dog if the trip allows it.
pub fn check_trip_rules(trip: &Trip, has_bicycle: bool, has_dog: bool) -> Result<(), BookingError> {
    if has_bicycle && !trip.bicycles_allowed {
        return Err(BookingError::BicyclesNotAllowed);
    }
    if has_dog && !trip.dogs_allowed {
        return Err(BookingError::DogsNotAllowed);
    }
    Ok(())
}

/// Confirmed bookings are terminal and cannot be cancelled through this path;
/// pending (even expired) and cancelled ones can be deleted.
pub fn ensure_cancellable(booking: &Booking) -> Result<(), BookingError> {
    if booking.status == BookingStatus::Confirmed {
        return Err(BookingError::NotCancellable);
    }
    Ok(())
}

/// Expiry is passive: nothing sweeps expired holds, the check happens at the
/// moment payment is attempted.
pub fn ensure_payable(booking: &Booking, now: DateTime<Utc>) -> Result<(), BookingError> {
    if booking.status != BookingStatus::Pending {
        return Err(BookingError::NotPending);
    }
    if booking.is_expired(now) {
        return Err(BookingError::HoldExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn trip(bicycles_allowed: bool, dogs_allowed: bool) -> Trip {
        let departure = Utc::now();
        Trip {
            id: Uuid::new_v4(),
            origin: Uuid::new_v4(),
            destination: Uuid::new_v4(),
            departure_time: departure,
            arrival_time: departure + Duration::hours(6),
            operator: "SNCF".to_string(),
            price: Decimal::new(5000, 2),
            bicycles_allowed,
            dogs_allowed,
        }
    }

    fn booking(status: BookingStatus) -> Booking {
        let mut booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Grace Hopper".to_string(),
            false,
            false,
            Duration::hours(1),
        );
        booking.status = status;
        booking
    }

    #[test]
    fn bicycle_and_dog_rules_follow_the_trip() {
        assert!(check_trip_rules(&trip(true, true), true, true).is_ok());
        assert!(matches!(
            check_trip_rules(&trip(false, true), true, false),
            Err(BookingError::BicyclesNotAllowed)
        ));
        assert!(matches!(
            check_trip_rules(&trip(true, false), false, true),
            Err(BookingError::DogsNotAllowed)
        ));
        // Not carrying anything is always fine.
        assert!(check_trip_rules(&trip(false, false), false, false).is_ok());
    }

    #[test]
    fn confirmed_bookings_cannot_be_cancelled() {
        assert!(ensure_cancellable(&booking(BookingStatus::Pending)).is_ok());
        assert!(matches!(
            ensure_cancellable(&booking(BookingStatus::Confirmed)),
            Err(BookingError::NotCancellable)
        ));
    }

    #[test]
    fn expired_holds_are_not_payable() {
        let b = booking(BookingStatus::Pending);
        assert!(ensure_payable(&b, b.created_at).is_ok());
        assert!(matches!(
            ensure_payable(&b, b.expires_at + Duration::seconds(1)),
            Err(BookingError::HoldExpired)
        ));
    }

    #[test]
    fn only_pending_bookings_are_payable() {
        let b = booking(BookingStatus::Confirmed);
        assert!(matches!(ensure_payable(&b, b.created_at), Err(BookingError::NotPending)));
    }
}
