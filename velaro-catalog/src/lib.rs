pub mod query;
pub mod station;
pub mod trip;

pub use query::{CatalogError, StationFilter, StationQuery, TripFilter, TripQuery};
pub use station::Station;
pub use trip::{Trip, TripDetail};
