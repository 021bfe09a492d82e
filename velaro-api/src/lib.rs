use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod middleware;
pub mod payments;
pub mod state;
pub mod stations;
pub mod trips;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    // Booking and payment routes sit behind the bearer-token middleware;
    // stations, trips and guest login are public.
    let protected = bookings::routes().merge(payments::routes()).layer(
        axum::middleware::from_fn_with_state(state.clone(), middleware::auth::auth_middleware),
    );

    Router::new()
        .merge(auth::routes())
        .merge(stations::routes())
        .merge(trips::routes())
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
