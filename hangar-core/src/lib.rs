pub mod order;
pub mod repository;
pub mod inventory;
pub mod payment;
pub mod events;

pub use order::{InvalidTransition, Order, OrderStatus};
pub use hangar_shared::PaymentMethod;

/// Failure talking to a synchronous collaborator (Inventory, Payment).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Upstream rejected the request: {0}")]
    Rejected(String),
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),
    #[error("Upstream call timed out")]
    Timeout,
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
