pub mod currency;
pub mod model;
pub mod processor;
pub mod reconcile;
pub mod source;

pub use model::{CreatePaymentRequest, Payment, PaymentStatus};
pub use processor::{PaymentProcessor, ProcessorError, SimulatedProcessor};
pub use reconcile::PaymentError;
pub use source::{MaskedSource, PaymentSource};
