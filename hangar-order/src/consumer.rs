use hangar_core::events::{InboundMessage, MessageSource, SourceError};
use hangar_shared::OrderAssembledEvent;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::errors::OrderError;
use crate::service::OrderService;

#[derive(Debug, thiserror::Error)]
pub enum ConsumerError {
    #[error("Failed to decode OrderAssembled at {topic}/{partition}@{offset}: {source}")]
    Decode {
        topic: String,
        partition: i32,
        offset: i64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Handler failed for order {order_id}: {source}")]
    Handler {
        order_id: uuid::Uuid,
        #[source]
        source: OrderError,
    },

    #[error(transparent)]
    Source(#[from] SourceError),
}

pub fn decode_assembled(message: &InboundMessage) -> Result<OrderAssembledEvent, ConsumerError> {
    serde_json::from_slice(&message.payload).map_err(|source| ConsumerError::Decode {
        topic: message.topic.clone(),
        partition: message.partition,
        offset: message.offset,
        source,
    })
}

/// Drains the "order assembled" feed one message at a time.
///
/// An offset is committed only after the handler returned success, or after
/// an event that can never apply (the order is not PAID) has been dropped.
/// Any other failure stops the loop without committing so that the host can
/// recreate the source and get the message redelivered.
pub struct AssembledEventConsumer<S> {
    source: S,
    service: Arc<OrderService>,
}

impl<S: MessageSource> AssembledEventConsumer<S> {
    pub fn new(source: S, service: Arc<OrderService>) -> Self {
        Self { source, service }
    }

    /// Runs until the source closes or a message cannot be handled.
    pub async fn run(mut self) -> Result<(), ConsumerError> {
        info!("OrderAssembled consumer running");

        while let Some(message) = self.source.next().await? {
            self.handle(&message).await?;
            self.source.commit(&message).await?;
        }

        info!("OrderAssembled feed closed");
        Ok(())
    }

    async fn handle(&self, message: &InboundMessage) -> Result<(), ConsumerError> {
        let event = decode_assembled(message).inspect_err(|e| {
            error!(error = %e, "Failed to decode OrderAssembled");
        })?;

        info!(
            topic = %message.topic,
            partition = message.partition,
            offset = message.offset,
            key = message.key.as_deref().unwrap_or("-"),
            event_id = %event.event_id,
            order_id = %event.order_id,
            user_id = %event.user_id,
            build_time_seconds = event.build_time_seconds,
            "Processing message"
        );

        match self
            .service
            .mark_assembled(event.order_id, event.build_time_seconds)
            .await
        {
            Ok(()) => Ok(()),
            Err(OrderError::InvalidOrderStatus { status, .. }) => {
                warn!(
                    order_id = %event.order_id,
                    status = %status,
                    "Dropping OrderAssembled for order that cannot be assembled"
                );
                Ok(())
            }
            Err(source) => {
                error!(order_id = %event.order_id, error = %source, "Failed to apply OrderAssembled");
                Err(ConsumerError::Handler {
                    order_id: event.order_id,
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryOrderRepository;
    use crate::mocks::{MockInventory, MockPayment, MockPublisher, QueueSource};
    use hangar_core::repository::OrderRepository;
    use hangar_core::{Order, OrderStatus, PaymentMethod};
    use uuid::Uuid;

    async fn service_with_paid_order() -> (Arc<OrderService>, Arc<InMemoryOrderRepository>, Order) {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let mut order = repo
            .create_order(&Order::new("user-1".to_string(), vec!["p1".to_string()], 10.0))
            .await
            .unwrap();
        order.mark_paid("txn-1".to_string(), PaymentMethod::Card).unwrap();
        repo.update_order(&order, OrderStatus::PendingPayment).await.unwrap();

        let service = Arc::new(OrderService::new(
            repo.clone(),
            Arc::new(MockInventory::with_parts(&[])),
            Arc::new(MockPayment::succeeding("unused")),
            Arc::new(MockPublisher::new()),
        ));
        (service, repo, order)
    }

    fn assembled_payload(order_id: Uuid) -> Vec<u8> {
        serde_json::to_vec(&OrderAssembledEvent {
            event_id: Uuid::new_v4(),
            order_id,
            user_id: "user-1".to_string(),
            build_time_seconds: 7,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_assembles_and_commits() {
        let (service, repo, order) = service_with_paid_order().await;
        let mut source = QueueSource::new();
        source.push_payload(0, assembled_payload(order.order_id));
        let committed = source.committed.clone();

        AssembledEventConsumer::new(source, service).run().await.unwrap();

        assert_eq!(
            repo.get_order(order.order_id).await.unwrap().status,
            OrderStatus::Assembled
        );
        assert_eq!(*committed.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_redelivery_is_harmless() {
        let (service, repo, order) = service_with_paid_order().await;
        let payload = assembled_payload(order.order_id);
        let mut source = QueueSource::new();
        source.push_payload(0, payload.clone());
        source.push_payload(0, payload);
        let committed = source.committed.clone();

        AssembledEventConsumer::new(source, service).run().await.unwrap();

        assert_eq!(
            repo.get_order(order.order_id).await.unwrap().status,
            OrderStatus::Assembled
        );
        assert_eq!(committed.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_decode_failure_stops_without_commit() {
        let (service, repo, order) = service_with_paid_order().await;
        let mut source = QueueSource::new();
        source.push_payload(3, b"not json".to_vec());
        source.push_payload(4, assembled_payload(order.order_id));
        let committed = source.committed.clone();

        let err = AssembledEventConsumer::new(source, service)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, ConsumerError::Decode { offset: 3, .. }));
        assert!(committed.lock().unwrap().is_empty());
        assert_eq!(
            repo.get_order(order.order_id).await.unwrap().status,
            OrderStatus::Paid
        );
    }

    #[tokio::test]
    async fn test_unknown_order_stops_without_commit() {
        let (service, _repo, _order) = service_with_paid_order().await;
        let mut source = QueueSource::new();
        source.push_payload(9, assembled_payload(Uuid::new_v4()));
        let committed = source.committed.clone();

        let err = AssembledEventConsumer::new(source, service)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ConsumerError::Handler {
                source: OrderError::OrderNotFound(_),
                ..
            }
        ));
        assert!(committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_event_for_cancelled_order_is_dropped_and_committed() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let mut order = repo
            .create_order(&Order::new("user-1".to_string(), vec!["p1".to_string()], 10.0))
            .await
            .unwrap();
        order.cancel().unwrap();
        repo.update_order(&order, OrderStatus::PendingPayment).await.unwrap();
        let service = Arc::new(OrderService::new(
            repo.clone(),
            Arc::new(MockInventory::with_parts(&[])),
            Arc::new(MockPayment::succeeding("unused")),
            Arc::new(MockPublisher::new()),
        ));

        let mut source = QueueSource::new();
        source.push_payload(1, assembled_payload(order.order_id));
        let committed = source.committed.clone();

        AssembledEventConsumer::new(source, service).run().await.unwrap();

        assert_eq!(*committed.lock().unwrap(), vec![1]);
        assert_eq!(
            repo.get_order(order.order_id).await.unwrap().status,
            OrderStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_source_error_is_surfaced() {
        let (service, _repo, _order) = service_with_paid_order().await;
        let mut source = QueueSource::new();
        source.push_error(SourceError::Receive("broker transport failure".to_string()));

        let err = AssembledEventConsumer::new(source, service)
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, ConsumerError::Source(SourceError::Receive(_))));
    }
}
