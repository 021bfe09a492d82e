use crate::source::SourceError;
use rust_decimal::Decimal;

/// Payment reconciliation failures. The API layer maps AlreadyPaid to 409 and
/// the rest to 400.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment amount must match trip price of {expected}")]
    AmountMismatch { expected: Decimal },

    #[error("Booking is already paid")]
    AlreadyPaid,

    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("currency '{0}' is not supported")]
    UnsupportedCurrency(String),

    #[error("{0}")]
    Source(#[from] SourceError),
}

/// The amount must equal the trip price exactly; there is no partial or
/// overpayment tolerance.
pub fn ensure_amount_matches(amount: Decimal, price: Decimal) -> Result<(), PaymentError> {
    if amount != price {
        return Err(PaymentError::AmountMismatch { expected: price });
    }
    Ok(())
}

/// At most one succeeded payment may ever exist per booking.
pub fn ensure_not_already_paid(has_succeeded_payment: bool) -> Result<(), PaymentError> {
    if has_succeeded_payment {
        return Err(PaymentError::AlreadyPaid);
    }
    Ok(())
}
