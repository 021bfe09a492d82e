pub mod identity;
pub mod repository;

pub use identity::{AuthenticatedUser, User};
