use hangar_core::events::MessageSource;
use hangar_order::{AssembledEventConsumer, OrderService};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

/// Keeps an OrderAssembled consumer alive.
///
/// Whenever the consumer stops on an error, the source is dropped and a new
/// one is built after `backoff`, so uncommitted messages are redelivered.
/// Returns once a source reports that its feed is closed.
pub async fn supervise_assembled_consumer<S, E, F>(
    mut make_source: F,
    service: Arc<OrderService>,
    backoff: Duration,
) where
    S: MessageSource,
    E: Display,
    F: FnMut() -> Result<S, E>,
{
    let mut restarts: u64 = 0;

    loop {
        match make_source() {
            Ok(source) => {
                info!(restarts, "Starting OrderAssembled consumer");
                match AssembledEventConsumer::new(source, service.clone()).run().await {
                    Ok(()) => {
                        info!("OrderAssembled consumer finished");
                        return;
                    }
                    Err(e) => error!(error = %e, "OrderAssembled consumer stopped"),
                }
            }
            Err(e) => error!(error = %e, "Failed to create OrderAssembled source"),
        }

        restarts += 1;
        sleep(backoff).await;
    }
}
