pub mod app_config;
pub mod database;
pub mod order_repo;
pub mod events;
pub mod grpc;

pub use database::DbClient;
pub use order_repo::PgOrderRepository;
pub use events::{EventProducer, KafkaMessageSource, KafkaOrderPaidPublisher};
pub use grpc::{GrpcInventoryClient, GrpcPaymentClient};
