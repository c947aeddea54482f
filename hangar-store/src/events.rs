use async_trait::async_trait;
use hangar_core::events::{InboundMessage, MessageSource, OrderPaidPublisher, PublishError, SourceError};
use hangar_shared::OrderPaidEvent;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use rdkafka::{Offset, TopicPartitionList};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct EventProducer {
    producer: FutureProducer,
}

impl EventProducer {
    pub fn new(brokers: &str) -> Result<Self, KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }

    pub async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), KafkaError> {
        let record = FutureRecord::to(topic).key(key).payload(payload);

        match self.producer.send(record, Timeout::After(Duration::from_secs(0))).await {
            Ok(delivery) => {
                info!(
                    topic = topic,
                    key = key,
                    partition = delivery.partition,
                    offset = delivery.offset,
                    "Sent message"
                );
                Ok(())
            }
            Err((e, _msg)) => {
                error!(topic = topic, key = key, error = %e, "Failed to send message");
                Err(e)
            }
        }
    }
}

/// Publishes `OrderPaidEvent` as JSON keyed by order id, so every event of
/// one order lands on the same partition.
pub struct KafkaOrderPaidPublisher {
    producer: EventProducer,
    topic: String,
}

impl KafkaOrderPaidPublisher {
    pub fn new(producer: EventProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }
}

pub fn encode_order_paid(event: &OrderPaidEvent) -> Result<(String, Vec<u8>), PublishError> {
    Ok((event.order_id.to_string(), serde_json::to_vec(event)?))
}

#[async_trait]
impl OrderPaidPublisher for KafkaOrderPaidPublisher {
    async fn publish(&self, event: &OrderPaidEvent) -> Result<(), PublishError> {
        let (key, payload) = encode_order_paid(event)?;

        self.producer
            .publish(&self.topic, &key, &payload)
            .await
            .map_err(|e| PublishError::Broker(e.to_string()))
    }
}

/// Kafka-backed feed with manual commits.
pub struct KafkaMessageSource {
    consumer: StreamConsumer,
}

impl KafkaMessageSource {
    pub fn new(brokers: &str, group_id: &str, topic: &str) -> Result<Self, KafkaError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[topic])?;
        info!(topic = topic, group_id = group_id, "Subscribed to topic");

        Ok(Self { consumer })
    }
}

#[async_trait]
impl MessageSource for KafkaMessageSource {
    async fn next(&mut self) -> Result<Option<InboundMessage>, SourceError> {
        let message = self
            .consumer
            .recv()
            .await
            .map_err(|e| SourceError::Receive(e.to_string()))?;

        let key = message
            .key()
            .map(|raw| String::from_utf8_lossy(raw).into_owned());

        debug!(
            topic = message.topic(),
            partition = message.partition(),
            offset = message.offset(),
            "Received message"
        );

        Ok(Some(InboundMessage {
            topic: message.topic().to_string(),
            partition: message.partition(),
            offset: message.offset(),
            key,
            payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        }))
    }

    async fn commit(&mut self, message: &InboundMessage) -> Result<(), SourceError> {
        let commit_err = |reason: String| SourceError::Commit {
            topic: message.topic.clone(),
            partition: message.partition,
            offset: message.offset,
            reason,
        };

        // Kafka stores the offset of the next message to read.
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(&message.topic, message.partition, Offset::Offset(message.offset + 1))
            .map_err(|e| commit_err(e.to_string()))?;

        self.consumer
            .commit(&tpl, CommitMode::Async)
            .map_err(|e| commit_err(e.to_string()))
    }
}
