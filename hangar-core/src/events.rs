use async_trait::async_trait;
use hangar_shared::OrderPaidEvent;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Broker rejected event: {0}")]
    Broker(String),
}

/// Outbound "order paid" contract. Fire-once, no internal retry.
#[async_trait]
pub trait OrderPaidPublisher: Send + Sync {
    async fn publish(&self, event: &OrderPaidEvent) -> Result<(), PublishError>;
}

/// A raw message pulled from the assembled-events feed.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<String>,
    pub payload: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to receive message: {0}")]
    Receive(String),
    #[error("Failed to commit offset {offset} on {topic}/{partition}: {reason}")]
    Commit {
        topic: String,
        partition: i32,
        offset: i64,
        reason: String,
    },
}

/// Pull-based message feed with explicit offset commits.
///
/// `next` returns `Ok(None)` once the feed is closed. A message that is not
/// committed is redelivered after the source is recreated.
#[async_trait]
pub trait MessageSource: Send {
    async fn next(&mut self) -> Result<Option<InboundMessage>, SourceError>;

    async fn commit(&mut self, message: &InboundMessage) -> Result<(), SourceError>;
}
