use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::auth::Claims;
use crate::state::AppState;
use velaro_core::identity::User;

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/auth/guest", post(login_guest))
}

/// Mint a guest identity. The user row is persisted first so bookings can
/// reference their owner.
async fn login_guest(State(state): State<AppState>) -> Result<Json<AuthResponse>, ApiError> {
    let user = User::guest();
    state.users.create_user(&user).await?;

    let claims = Claims {
        sub: user.id.to_string(),
        scope: "read write".to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("Token encoding failed: {}", e)))?;

    Ok(Json(AuthResponse { token }))
}
