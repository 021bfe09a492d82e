use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use velaro_booking::{Booking, BookingStatus};
use velaro_core::repository::BookingRepository;
use velaro_shared::pagination::Page;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    trip_id: Uuid,
    user_id: Uuid,
    passenger_name: String,
    has_bicycle: bool,
    has_dog: bool,
    status: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = String;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status: BookingStatus = row.status.parse()?;
        Ok(Booking {
            id: row.id,
            trip_id: row.trip_id,
            user_id: row.user_id,
            passenger_name: row.passenger_name,
            has_bicycle: row.has_bicycle,
            has_dog: row.has_dog,
            status,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str =
    "id, trip_id, user_id, passenger_name, has_bicycle, has_dog, status, expires_at, created_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(
        &self,
        booking: &Booking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, trip_id, user_id, passenger_name, has_bicycle, has_dog, status, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(booking.id)
        .bind(booking.trip_id)
        .bind(booking.user_id)
        .bind(&booking.passenger_name)
        .bind(booking.has_bicycle)
        .bind(booking.has_dog)
        .bind(booking.status.as_str())
        .bind(booking.expires_at)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_booking(
        &self,
        id: Uuid,
    ) -> Result<Option<Booking>, Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS);
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Booking::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn list_bookings(
        &self,
        user_id: Uuid,
        page: &Page,
    ) -> Result<(Vec<Booking>, i64), Box<dyn std::error::Error + Send + Sync>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            BOOKING_COLUMNS
        );
        let rows = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(user_id)
            .bind(page.limit as i64)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let bookings = rows
            .into_iter()
            .map(Booking::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((bookings, total))
    }

    async fn delete_booking(
        &self,
        id: Uuid,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
