use anyhow::Context;
use hangar_api::{app, worker, AppState};
use hangar_core::events::OrderPaidPublisher;
use hangar_core::inventory::InventoryClient;
use hangar_core::payment::PaymentClient;
use hangar_core::repository::OrderRepository;
use hangar_order::{InMemoryOrderRepository, OrderMetrics, OrderService};
use hangar_store::app_config::{Config, LoggingConfig, StorageBackend};
use hangar_store::{
    DbClient, EventProducer, GrpcInventoryClient, GrpcPaymentClient, KafkaMessageSource,
    KafkaOrderPaidPublisher, PgOrderRepository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_repository(config: &Config) -> anyhow::Result<Arc<dyn OrderRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory order storage, orders are lost on restart");
            Ok(Arc::new(InMemoryOrderRepository::new()))
        }
        StorageBackend::Postgres => {
            let db = DbClient::new(&config.database)
                .await
                .context("Failed to connect to Postgres")?;
            if config.database.run_migrations {
                db.migrate().await.context("Failed to run migrations")?;
            }
            Ok(Arc::new(PgOrderRepository::new(db.pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;
    init_tracing(&config.logging);
    tracing::info!("Starting Hangar order service on port {}", config.server.port);

    let repository = build_repository(&config).await?;

    let inventory: Arc<dyn InventoryClient> = Arc::new(
        GrpcInventoryClient::connect_lazy(&config.grpc.inventory_url, config.grpc.timeout())
            .context("Invalid inventory service url")?,
    );
    let payment: Arc<dyn PaymentClient> = Arc::new(
        GrpcPaymentClient::connect_lazy(&config.grpc.payment_url, config.grpc.timeout())
            .context("Invalid payment service url")?,
    );

    let producer = EventProducer::new(&config.kafka.brokers)
        .context("Failed to create Kafka producer")?;
    let publisher: Arc<dyn OrderPaidPublisher> = Arc::new(KafkaOrderPaidPublisher::new(
        producer,
        config.kafka.order_paid_topic.clone(),
    ));

    let registry = Arc::new(prometheus::Registry::new());
    let metrics = OrderMetrics::new(&registry).context("Failed to register metrics")?;

    let orders = Arc::new(
        OrderService::new(repository, inventory, payment, publisher).with_metrics(metrics),
    );

    let kafka = config.kafka.clone();
    let consumer_task = tokio::spawn(worker::supervise_assembled_consumer(
        move || {
            KafkaMessageSource::new(
                &kafka.brokers,
                &kafka.consumer_group_id,
                &kafka.order_assembled_topic,
            )
        },
        orders.clone(),
        config.kafka.consumer_restart_backoff(),
    ));

    let app = app(AppState {
        orders,
        registry,
        request_timeout: config.server.request_timeout(),
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    consumer_task.abort();
    tracing::info!("Hangar order service stopped");
    Ok(())
}
