use hangar_core::repository::RepositoryError;
use hangar_core::OrderStatus;
use uuid::Uuid;

/// Caller-facing failures of the order service.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Some parts were not found: requested {requested}, resolved {resolved}")]
    PartsNotFound { requested: usize, resolved: usize },

    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Order {order_id} is {status}, operation not allowed")]
    InvalidOrderStatus { order_id: Uuid, status: OrderStatus },

    /// The payment cause is logged, never surfaced.
    #[error("Payment failed")]
    PaymentFailed,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<RepositoryError> for OrderError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => OrderError::OrderNotFound(id),
            // Someone else moved the order first; our transition is no longer legal.
            RepositoryError::Conflict {
                order_id, actual, ..
            } => OrderError::InvalidOrderStatus {
                order_id,
                status: actual,
            },
            RepositoryError::Storage(e) => OrderError::Internal(e.to_string()),
        }
    }
}
