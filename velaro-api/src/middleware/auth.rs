use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use velaro_core::identity::AuthenticatedUser;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// Space-separated OAuth-style scopes, e.g. "read write".
    pub scope: String,
    pub exp: usize,
}

// ============================================================================
// Authentication Middleware
// ============================================================================

/// Validates the bearer token and injects the caller as an
/// [`AuthenticatedUser`] request extension. Handlers receive the identity
/// explicitly; nothing below this middleware reads ambient session state.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract token from Authorization header
    let TypedHeader(Authorization(bearer)) = bearer
        .ok_or_else(|| ApiError::Authentication("Authentication required".to_string()))?;

    // 2. Decode and validate JWT
    let token_data = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Authentication("Invalid or expired token".to_string()))?;

    let claims = token_data.claims;

    // 3. The subject must be a user id
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Authentication("Invalid token subject".to_string()))?;

    // 4. Inject the caller into request extensions
    req.extensions_mut()
        .insert(AuthenticatedUser::new(user_id, &claims.scope));

    Ok(next.run(req).await)
}

// ============================================================================
// Scope Check Helper
// ============================================================================

pub fn require_write_scope(user: &AuthenticatedUser) -> Result<(), ApiError> {
    if !user.has_scope(velaro_core::identity::SCOPE_WRITE) {
        return Err(ApiError::Forbidden("Write scope required".to_string()));
    }
    Ok(())
}
