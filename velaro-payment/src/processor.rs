use crate::source::PaymentSource;
use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use std::time::Duration;

/// Capability boundary to the downstream payment gateway. Ok(true) means the
/// charge was approved, Ok(false) declined; Err means the gateway itself
/// failed and nothing can be assumed about the charge.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn charge(
        &self,
        source: &PaymentSource,
        amount: Decimal,
        currency: &str,
    ) -> Result<bool, ProcessorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("payment processor unavailable: {0}")]
    Unavailable(String),
}

/// Stand-in gateway that approves with a configurable probability, modeling
/// flaky downstream acceptance. Swap in a real adapter without touching the
/// reconciliation flow.
pub struct SimulatedProcessor {
    approval_rate: f64,
}

impl SimulatedProcessor {
    pub fn new(approval_rate: f64) -> Self {
        Self {
            approval_rate: approval_rate.clamp(0.0, 1.0),
        }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn charge(
        &self,
        _source: &PaymentSource,
        amount: Decimal,
        currency: &str,
    ) -> Result<bool, ProcessorError> {
        // Simulated settlement latency.
        tokio::time::sleep(Duration::from_millis(100)).await;

        let approved = rand::thread_rng().gen_bool(self.approval_rate);
        tracing::info!(%amount, currency, approved, "simulated charge");
        Ok(approved)
    }
}
