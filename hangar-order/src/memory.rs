use async_trait::async_trait;
use chrono::Utc;
use hangar_core::repository::{OrderRepository, RepositoryError, RepositoryResult};
use hangar_core::{Order, OrderStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local order store with the same semantics as the Postgres one.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create_order(&self, order: &Order) -> RepositoryResult<Order> {
        let mut orders = self.orders.write().await;
        let mut stored = order.clone();
        // Ids are assigned by the store, never trusted from the caller.
        while orders.contains_key(&stored.order_id) {
            stored.order_id = Uuid::new_v4();
        }
        orders.insert(stored.order_id, stored.clone());
        Ok(stored)
    }

    async fn get_order(&self, id: Uuid) -> RepositoryResult<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn update_order(&self, order: &Order, expected: OrderStatus) -> RepositoryResult<()> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .get_mut(&order.order_id)
            .ok_or(RepositoryError::NotFound(order.order_id))?;

        if stored.status != expected {
            return Err(RepositoryError::Conflict {
                order_id: order.order_id,
                expected,
                actual: stored.status,
            });
        }

        stored.status = order.status;
        stored.transaction_id = order.transaction_id.clone();
        stored.payment_method = order.payment_method;
        stored.updated_at = Utc::now();
        Ok(())
    }
}
