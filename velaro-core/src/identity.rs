use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SCOPE_READ: &str = "read";
pub const SCOPE_WRITE: &str = "write";

/// A persisted user. Guest identities are minted on demand by the auth
/// endpoint so bookings always reference a real owner row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn guest() -> Self {
        let id = Uuid::new_v4();
        Self {
            display_name: format!("guest-{}", id.simple()),
            id,
            created_at: Utc::now(),
        }
    }
}

/// The authenticated caller, extracted from the bearer token by the auth
/// middleware and passed explicitly into every handler. There is no ambient
/// request/session context anywhere below the middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub scopes: Vec<String>,
}

impl AuthenticatedUser {
    pub fn new(id: Uuid, scope: &str) -> Self {
        Self {
            id,
            scopes: scope.split_whitespace().map(String::from).collect(),
        }
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
