pub mod lifecycle;
pub mod model;

pub use lifecycle::BookingError;
pub use model::{Booking, BookingStatus, CreateBookingRequest};
