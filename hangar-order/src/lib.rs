pub mod errors;
pub mod service;
pub mod consumer;
pub mod memory;
pub mod metrics;

#[cfg(test)]
pub(crate) mod mocks;

pub use errors::{OrderError, OrderResult};
pub use service::OrderService;
pub use consumer::{AssembledEventConsumer, ConsumerError};
pub use memory::InMemoryOrderRepository;
pub use metrics::OrderMetrics;
