use crate::currency;
use crate::reconcile::PaymentError;
use crate::source::{MaskedSource, PaymentSource};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "succeeded" => Ok(PaymentStatus::Succeeded),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

/// A payment attempt against a booking. The source is stored masked; the
/// plain instrument never leaves the request scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub source: MaskedSource,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(booking_id: Uuid, amount: Decimal, currency: String, source: MaskedSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            amount,
            currency,
            source,
            status: PaymentStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Body of POST /api/bookings/{id}/payment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: Decimal,
    pub currency: String,
    pub source: PaymentSource,
}

impl CreatePaymentRequest {
    pub fn validate(&self, current_year: i32) -> Result<(), PaymentError> {
        if self.amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }
        if !currency::is_supported(&self.currency) {
            return Err(PaymentError::UnsupportedCurrency(self.currency.clone()));
        }
        self.source.validate(current_year)?;
        Ok(())
    }
}
