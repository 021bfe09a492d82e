use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use velaro_api::{app, state::{AppState, AuthConfig}};
use velaro_payment::SimulatedProcessor;
use velaro_store::{
    PgBookingRepository, PgPaymentRepository, PgStationRepository, PgTripRepository,
    PgUserRepository,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velaro_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = velaro_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Velaro API on port {}", config.server.port);

    let db = velaro_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let pool = db.pool.clone();
    let app_state = AppState {
        stations: Arc::new(PgStationRepository::new(pool.clone())),
        trips: Arc::new(PgTripRepository::new(pool.clone())),
        bookings: Arc::new(PgBookingRepository::new(pool.clone())),
        payments: Arc::new(PgPaymentRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool)),
        processor: Arc::new(SimulatedProcessor::new(config.payments.approval_rate)),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        booking_hold_seconds: config.booking.hold_seconds,
        public_url: config.server.public_url.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
