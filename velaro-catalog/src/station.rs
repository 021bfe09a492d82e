use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A train station. Immutable reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    /// ISO 3166-1 alpha-2, e.g. "DE".
    pub country_code: String,
    /// IANA timezone name, e.g. "Europe/Berlin".
    pub timezone: String,
}
