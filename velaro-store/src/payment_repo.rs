use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use velaro_core::repository::PaymentRepository;
use velaro_payment::{MaskedSource, Payment, PaymentStatus};

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn source_type(source: &MaskedSource) -> &'static str {
    match source {
        MaskedSource::Card(_) => "card",
        MaskedSource::BankAccount(_) => "bank_account",
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn create_payment(
        &self,
        payment: &Payment,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let source_details = serde_json::to_value(&payment.source)?;

        sqlx::query(
            r#"
            INSERT INTO payments (id, booking_id, amount, currency, source_type, source_details, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(payment.id)
        .bind(payment.booking_id)
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(source_type(&payment.source))
        .bind(source_details)
        .bind(payment.status.as_str())
        .bind(payment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn booking_has_succeeded_payment(
        &self,
        booking_id: Uuid,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM payments WHERE booking_id = $1 AND status = 'succeeded')",
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn settle_payment(
        &self,
        payment_id: Uuid,
        booking_id: Uuid,
        succeeded: bool,
    ) -> Result<PaymentStatus, Box<dyn std::error::Error + Send + Sync>> {
        let mut tx = self.pool.begin().await?;

        // Lock the booking row and re-check the hold inside the transaction:
        // a concurrent settle (or an expiry that landed after the handler's
        // check) must not confirm this booking.
        let row = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT status, expires_at FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let payable = matches!(
            &row,
            Some((status, expires_at)) if status == "pending" && *expires_at > Utc::now()
        );

        // An approval for a hold that is gone is recorded as failed rather
        // than confirming a dead booking.
        let final_status = if succeeded && payable {
            PaymentStatus::Succeeded
        } else {
            PaymentStatus::Failed
        };

        sqlx::query("UPDATE payments SET status = $1 WHERE id = $2")
            .bind(final_status.as_str())
            .bind(payment_id)
            .execute(&mut *tx)
            .await?;

        if final_status == PaymentStatus::Succeeded {
            sqlx::query("UPDATE bookings SET status = 'confirmed' WHERE id = $1")
                .bind(booking_id)
                .execute(&mut *tx)
                .await?;
        }

        // Both writes commit together or neither does.
        tx.commit().await?;

        Ok(final_status)
    }
}
