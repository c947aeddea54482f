use async_trait::async_trait;
use uuid::Uuid;

use crate::order::{Order, OrderStatus};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Order {order_id} was modified concurrently: expected {expected}, found {actual}")]
    Conflict {
        order_id: Uuid,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository trait for order data access
///
/// Orders are never deleted. `update_order` is a compare-and-swap on
/// `status`: the write only lands if the stored status still equals
/// `expected`, otherwise `RepositoryError::Conflict` is returned and the
/// row is left untouched.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create_order(&self, order: &Order) -> RepositoryResult<Order>;

    async fn get_order(&self, id: Uuid) -> RepositoryResult<Order>;

    /// Overwrites `status`, `transaction_id` and `payment_method`.
    async fn update_order(&self, order: &Order, expected: OrderStatus) -> RepositoryResult<()>;
}
