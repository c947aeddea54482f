pub mod models;

pub use models::events::{OrderAssembledEvent, OrderPaidEvent};
pub use models::payment::PaymentMethod;
