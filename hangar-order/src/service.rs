use hangar_core::events::OrderPaidPublisher;
use hangar_core::inventory::{InventoryClient, PartsFilter};
use hangar_core::payment::PaymentClient;
use hangar_core::repository::{OrderRepository, RepositoryError};
use hangar_core::{Order, OrderStatus, PaymentMethod};
use hangar_shared::OrderPaidEvent;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::{OrderError, OrderResult};
use crate::metrics::OrderMetrics;

/// Orchestrates the order lifecycle across the repository, inventory,
/// payment and the "order paid" event stream.
///
/// Holds no order state of its own: every operation loads a fresh copy from
/// the repository, and writes are compare-and-swap on the status that was
/// loaded. Status and not-found checks always run before any call that has
/// an external side effect.
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    inventory: Arc<dyn InventoryClient>,
    payment: Arc<dyn PaymentClient>,
    publisher: Arc<dyn OrderPaidPublisher>,
    metrics: Option<OrderMetrics>,
}

impl OrderService {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        inventory: Arc<dyn InventoryClient>,
        payment: Arc<dyn PaymentClient>,
        publisher: Arc<dyn OrderPaidPublisher>,
    ) -> Self {
        Self {
            repository,
            inventory,
            payment,
            publisher,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: OrderMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Price the requested parts and persist a new PENDING_PAYMENT order.
    #[instrument(skip_all, fields(user_id = %user_id, parts = part_ids.len()))]
    pub async fn create_order(&self, user_id: &str, part_ids: Vec<String>) -> OrderResult<Order> {
        if part_ids.is_empty() {
            return Err(OrderError::BadRequest(
                "order must contain at least one part".to_string(),
            ));
        }

        let parts = self
            .inventory
            .list_parts(&PartsFilter::by_ids(&part_ids))
            .await
            .map_err(|e| {
                error!(error = %e, "Inventory lookup failed");
                OrderError::Internal(format!("inventory lookup failed: {}", e))
            })?;

        if parts.is_empty() || parts.len() != part_ids.len() {
            warn!(
                requested = part_ids.len(),
                resolved = parts.len(),
                "Inventory did not resolve every requested part"
            );
            return Err(OrderError::PartsNotFound {
                requested: part_ids.len(),
                resolved: parts.len(),
            });
        }

        if let Some(part) = parts.iter().find(|p| p.price < 0.0) {
            error!(part_id = %part.id, price = part.price, "Inventory returned a negative price");
            return Err(OrderError::Internal(format!(
                "negative price for part {}",
                part.id
            )));
        }

        let total_price: f64 = parts.iter().map(|p| p.price).sum();
        let order = Order::new(user_id.to_string(), part_ids, total_price);
        let created = self.repository.create_order(&order).await?;

        if let Some(metrics) = &self.metrics {
            metrics.record_created(created.total_price);
        }
        info!(order_id = %created.order_id, total_price = created.total_price, "Order created");

        Ok(created)
    }

    pub async fn get_order(&self, order_id: Uuid) -> OrderResult<Order> {
        Ok(self.repository.get_order(order_id).await?)
    }

    /// Charge the order once and move it to PAID, then announce it.
    ///
    /// If the charge succeeds but the event cannot be published, the order
    /// stays PAID and the publish error is returned.
    #[instrument(skip_all, fields(order_id = %order_id, payment_method = %payment_method))]
    pub async fn pay_order(
        &self,
        order_id: Uuid,
        payment_method: PaymentMethod,
    ) -> OrderResult<String> {
        let mut order = self.repository.get_order(order_id).await?;
        let loaded_status = order.status;

        if order.ensure_can_transition(OrderStatus::Paid).is_err() {
            warn!(status = %order.status, "Refusing to pay order");
            return Err(invalid_status(&order));
        }

        let transaction_id = self
            .payment
            .pay_order(order.order_id, &order.user_id, payment_method)
            .await
            .map_err(|e| {
                error!(error = %e, "Payment service rejected the charge");
                OrderError::PaymentFailed
            })?;

        order
            .mark_paid(transaction_id.clone(), payment_method)
            .map_err(|_| invalid_status(&order))?;

        if let Err(e) = self.repository.update_order(&order, loaded_status).await {
            // The charge has landed at the payment provider at this point.
            error!(
                error = %e,
                transaction_id = %transaction_id,
                "Order charged but PAID status was not persisted"
            );
            return Err(e.into());
        }
        self.record_transition(OrderStatus::Paid);

        let event = OrderPaidEvent::new(
            order.order_id,
            order.user_id.clone(),
            payment_method,
            transaction_id.clone(),
        );
        self.publisher.publish(&event).await.map_err(|e| {
            error!(
                error = %e,
                event_id = %event.event_id,
                "Order is PAID but the order-paid event was not published"
            );
            OrderError::Internal(format!("failed to publish order paid event: {}", e))
        })?;

        info!(transaction_id = %transaction_id, "Order paid");
        Ok(transaction_id)
    }

    #[instrument(skip_all, fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: Uuid) -> OrderResult<()> {
        let mut order = self.repository.get_order(order_id).await?;
        let loaded_status = order.status;

        order.cancel().map_err(|_| {
            warn!(status = %loaded_status, "Refusing to cancel order");
            invalid_status(&order)
        })?;

        self.repository.update_order(&order, loaded_status).await?;
        self.record_transition(OrderStatus::Cancelled);

        info!("Order cancelled");
        Ok(())
    }

    /// Handle an "order assembled" notification.
    ///
    /// Re-applying it to an already ASSEMBLED order re-asserts the status and
    /// succeeds, so redelivered events are harmless.
    #[instrument(skip_all, fields(order_id = %order_id, build_time_seconds = build_time_seconds))]
    pub async fn mark_assembled(&self, order_id: Uuid, build_time_seconds: i64) -> OrderResult<()> {
        let mut order = self.repository.get_order(order_id).await?;
        let loaded_status = order.status;

        if loaded_status == OrderStatus::Assembled {
            debug!("Order already assembled, re-asserting");
            self.repository
                .update_order(&order, OrderStatus::Assembled)
                .await?;
            return Ok(());
        }

        order.mark_assembled().map_err(|_| {
            warn!(status = %loaded_status, "Assembled event for an order that is not PAID");
            invalid_status(&order)
        })?;

        match self.repository.update_order(&order, loaded_status).await {
            Ok(()) => {}
            // A concurrent delivery of the same event got there first.
            Err(RepositoryError::Conflict {
                actual: OrderStatus::Assembled,
                ..
            }) => {
                debug!("Order assembled concurrently");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        self.record_transition(OrderStatus::Assembled);

        info!("Order assembled");
        Ok(())
    }

    fn record_transition(&self, status: OrderStatus) {
        if let Some(metrics) = &self.metrics {
            metrics.record_transition(status);
        }
    }
}

fn invalid_status(order: &Order) -> OrderError {
    OrderError::InvalidOrderStatus {
        order_id: order.order_id,
        status: order.status,
    }
}
