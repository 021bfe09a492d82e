pub mod pagination;
pub mod pii;
pub mod problem;

pub use pagination::{Page, PageLinks};
pub use problem::Problem;
