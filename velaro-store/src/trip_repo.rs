use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use velaro_catalog::{Station, Trip, TripDetail, TripFilter};
use velaro_core::repository::TripRepository;
use velaro_shared::pagination::Page;

use crate::station_repo::StationRow;

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_station(&self, id: Uuid) -> Result<Option<Station>, sqlx::Error> {
        let row = sqlx::query_as::<_, StationRow>(
            "SELECT id, name, address, country_code, timezone FROM stations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Station::from))
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    origin_id: Uuid,
    destination_id: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    operator: String,
    price: Decimal,
    bicycles_allowed: bool,
    dogs_allowed: bool,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip {
            id: row.id,
            origin: row.origin_id,
            destination: row.destination_id,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            operator: row.operator,
            price: row.price,
            bicycles_allowed: row.bicycles_allowed,
            dogs_allowed: row.dogs_allowed,
        }
    }
}

const TRIP_COLUMNS: &str = "id, origin_id, destination_id, departure_time, arrival_time, operator, price, bicycles_allowed, dogs_allowed";

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn search_trips(
        &self,
        filter: &TripFilter,
        page: &Page,
    ) -> Result<(Vec<Trip>, i64), Box<dyn std::error::Error + Send + Sync>> {
        let mut where_clause = String::from(
            "WHERE origin_id = $1 AND destination_id = $2 AND departure_time >= $3 AND departure_time <= $4",
        );
        // Only an explicit true filters; absent/false means "no filter".
        if filter.bicycles {
            where_clause.push_str(" AND bicycles_allowed = TRUE");
        }
        if filter.dogs {
            where_clause.push_str(" AND dogs_allowed = TRUE");
        }

        let list_sql = format!(
            "SELECT {} FROM trips {} ORDER BY departure_time ASC LIMIT $5 OFFSET $6",
            TRIP_COLUMNS, where_clause
        );
        let count_sql = format!("SELECT COUNT(*) FROM trips {}", where_clause);

        let rows = sqlx::query_as::<_, TripRow>(&list_sql)
            .bind(filter.origin)
            .bind(filter.destination)
            .bind(filter.window_start)
            .bind(filter.window_end)
            .bind(page.limit as i64)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.origin)
            .bind(filter.destination)
            .bind(filter.window_start)
            .bind(filter.window_end)
            .fetch_one(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Trip::from).collect(), total))
    }

    async fn get_trip(
        &self,
        id: Uuid,
    ) -> Result<Option<Trip>, Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!("SELECT {} FROM trips WHERE id = $1", TRIP_COLUMNS);
        let row = sqlx::query_as::<_, TripRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Trip::from))
    }

    async fn get_trip_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<TripDetail>, Box<dyn std::error::Error + Send + Sync>> {
        let trip = match self.get_trip(id).await? {
            Some(trip) => trip,
            None => return Ok(None),
        };

        let origin = self
            .fetch_station(trip.origin)
            .await?
            .ok_or("Trip origin station missing")?;
        let destination = self
            .fetch_station(trip.destination)
            .await?
            .ok_or("Trip destination station missing")?;

        Ok(Some(TripDetail { trip, origin, destination }))
    }
}
