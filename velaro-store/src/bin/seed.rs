use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use velaro_store::DbClient;

const BERLIN_HBF: &str = "efdbb9d1-02c2-4bc3-afb7-6788d8782b1e";
const PARIS_NORD: &str = "b2e783e1-c824-4d63-b37a-d8d698862f1d";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("info"))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = velaro_store::app_config::Config::load().expect("Failed to load config");
    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    tracing::info!("Seeding database...");

    let berlin = Uuid::parse_str(BERLIN_HBF).unwrap();
    let paris = Uuid::parse_str(PARIS_NORD).unwrap();

    let stations = [
        (berlin, "Berlin Hauptbahnhof", "Invalidenstraße 10557 Berlin, Germany", "DE", "Europe/Berlin"),
        (paris, "Paris Gare du Nord", "18 Rue de Dunkerque 75010 Paris, France", "FR", "Europe/Paris"),
        (Uuid::new_v4(), "Amsterdam Centraal", "Stationsplein 1012 AB Amsterdam, Netherlands", "NL", "Europe/Amsterdam"),
        (Uuid::new_v4(), "Brussels Central", "Carrefour de l'Europe 1000 Brussels, Belgium", "BE", "Europe/Brussels"),
    ];

    for (id, name, address, country, timezone) in &stations {
        sqlx::query(
            r#"
            INSERT INTO stations (id, name, address, country_code, timezone)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(country)
        .bind(timezone)
        .execute(&db.pool)
        .await
        .expect("Failed to insert station");
    }
    tracing::info!("Created {} stations", stations.len());

    // A day of Berlin <-> Paris trips, every two hours from 06:00.
    let tomorrow = (Utc::now() + Duration::days(1))
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();

    let mut trip_count = 0;
    for hour in (6..=20).step_by(2) {
        let departure = tomorrow + Duration::hours(hour as i64);
        let arrival = departure + Duration::hours(6);
        let operator = if hour % 4 == 0 { "Deutsche Bahn" } else { "SNCF" };
        let price = Decimal::from(50 + hour * 2);
        let bicycles_allowed = hour % 3 != 0;

        for (origin, destination) in [(berlin, paris), (paris, berlin)] {
            sqlx::query(
                r#"
                INSERT INTO trips (id, origin_id, destination_id, departure_time, arrival_time, operator, price, bicycles_allowed, dogs_allowed)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(origin)
            .bind(destination)
            .bind(departure)
            .bind(arrival)
            .bind(operator)
            .bind(price)
            .bind(bicycles_allowed)
            .bind(true)
            .execute(&db.pool)
            .await
            .expect("Failed to insert trip");
            trip_count += 1;
        }
    }

    tracing::info!("Created {} trips", trip_count);
    tracing::info!("Seeding complete");
}
