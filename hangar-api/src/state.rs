use hangar_order::OrderService;
use prometheus::Registry;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub registry: Arc<Registry>,
    pub request_timeout: Duration,
}
