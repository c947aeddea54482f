use async_trait::async_trait;
use hangar_core::events::{InboundMessage, MessageSource, OrderPaidPublisher, PublishError, SourceError};
use hangar_core::inventory::{InventoryClient, Part, PartsFilter};
use hangar_core::payment::PaymentClient;
use hangar_core::repository::{OrderRepository, RepositoryError, RepositoryResult};
use hangar_core::{ClientError, ClientResult, Order, OrderStatus, PaymentMethod};
use hangar_shared::OrderPaidEvent;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct MockInventory {
    prices: Mutex<HashMap<String, f64>>,
    calls: AtomicUsize,
    fail_next: AtomicBool,
}

impl MockInventory {
    pub fn with_parts(parts: &[(&str, f64)]) -> Self {
        Self {
            prices: Mutex::new(
                parts
                    .iter()
                    .map(|(id, price)| (id.to_string(), *price))
                    .collect(),
            ),
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    pub fn set_price(&self, id: &str, price: f64) {
        self.prices.lock().unwrap().insert(id.to_string(), price);
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InventoryClient for MockInventory {
    async fn list_parts(&self, filter: &PartsFilter) -> ClientResult<Vec<Part>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ClientError::Unavailable("inventory down".to_string()));
        }

        let prices = self.prices.lock().unwrap();
        Ok(filter
            .ids
            .iter()
            .filter_map(|id| {
                prices.get(id).map(|price| Part {
                    id: id.clone(),
                    name: format!("part {}", id),
                    price: *price,
                })
            })
            .collect())
    }
}

type ChargeHook = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct MockPayment {
    outcome: Mutex<Result<String, String>>,
    requests: Mutex<Vec<(Uuid, String, PaymentMethod)>>,
    hook: Mutex<Option<ChargeHook>>,
}

impl MockPayment {
    pub fn succeeding(transaction_id: &str) -> Self {
        Self {
            outcome: Mutex::new(Ok(transaction_id.to_string())),
            requests: Mutex::new(Vec::new()),
            hook: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, reason: &str) {
        *self.outcome.lock().unwrap() = Err(reason.to_string());
    }

    /// Run `hook` while the charge is "in flight".
    pub fn on_charge<F>(&self, hook: F)
    where
        F: Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static,
    {
        *self.hook.lock().unwrap() = Some(Arc::new(hook));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(Uuid, String, PaymentMethod)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentClient for MockPayment {
    async fn pay_order(
        &self,
        order_id: Uuid,
        user_id: &str,
        payment_method: PaymentMethod,
    ) -> ClientResult<String> {
        self.requests
            .lock()
            .unwrap()
            .push((order_id, user_id.to_string(), payment_method));

        let hook = self.hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook().await;
        }

        self.outcome
            .lock()
            .unwrap()
            .clone()
            .map_err(ClientError::Rejected)
    }
}

#[derive(Default)]
pub struct MockPublisher {
    events: Mutex<Vec<OrderPaidEvent>>,
    fail: AtomicBool,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<OrderPaidEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderPaidPublisher for MockPublisher {
    async fn publish(&self, event: &OrderPaidEvent) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Broker("broker unreachable".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Every call fails with a storage error.
pub struct FailingRepository;

#[async_trait]
impl OrderRepository for FailingRepository {
    async fn create_order(&self, _order: &Order) -> RepositoryResult<Order> {
        Err(RepositoryError::Storage("connection refused".into()))
    }

    async fn get_order(&self, _id: Uuid) -> RepositoryResult<Order> {
        Err(RepositoryError::Storage("connection refused".into()))
    }

    async fn update_order(&self, _order: &Order, _expected: OrderStatus) -> RepositoryResult<()> {
        Err(RepositoryError::Storage("connection refused".into()))
    }
}

/// Channel-like source fed from a queue, recording commits.
#[derive(Default)]
pub struct QueueSource {
    pending: VecDeque<Result<InboundMessage, SourceError>>,
    pub committed: Arc<Mutex<Vec<i64>>>,
}

impl QueueSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_payload(&mut self, offset: i64, payload: impl Into<Vec<u8>>) {
        self.pending.push_back(Ok(InboundMessage {
            topic: "order.assembled".to_string(),
            partition: 0,
            offset,
            key: Some(format!("order-key-{}", offset)),
            payload: payload.into(),
        }));
    }

    pub fn push_error(&mut self, error: SourceError) {
        self.pending.push_back(Err(error));
    }
}

#[async_trait]
impl MessageSource for QueueSource {
    async fn next(&mut self) -> Result<Option<InboundMessage>, SourceError> {
        self.pending.pop_front().transpose()
    }

    async fn commit(&mut self, message: &InboundMessage) -> Result<(), SourceError> {
        self.committed.lock().unwrap().push(message.offset);
        Ok(())
    }
}

/// Serves a pinned snapshot from `get_order` while writes hit the real
/// store, as when two deliveries of one event interleave.
pub struct StaleReadRepository {
    pub inner: Arc<dyn OrderRepository>,
    pub snapshot: Order,
}

#[async_trait]
impl OrderRepository for StaleReadRepository {
    async fn create_order(&self, order: &Order) -> RepositoryResult<Order> {
        self.inner.create_order(order).await
    }

    async fn get_order(&self, id: Uuid) -> RepositoryResult<Order> {
        if id == self.snapshot.order_id {
            return Ok(self.snapshot.clone());
        }
        self.inner.get_order(id).await
    }

    async fn update_order(&self, order: &Order, expected: OrderStatus) -> RepositoryResult<()> {
        self.inner.update_order(order, expected).await
    }
}
