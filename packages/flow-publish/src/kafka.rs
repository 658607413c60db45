//! Kafka producer wrapper with best-effort delivery.
//!
//! Delivery failures are reported to the caller, which logs and moves on;
//! there is no retry or backoff. Flow export over UDP is already lossy and
//! the pipeline does not pretend otherwise.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};

use crate::error::PublishError;

/// Message key label attached to every published record.
pub const MESSAGE_KEY: &str = "netflow-log";

/// Narrow publishing seam so the ingest loop can be driven against an
/// in-memory implementation in tests.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publishes one payload under the given message key.
    async fn publish(&self, payload: &[u8], key: &str) -> Result<(), PublishError>;
}

/// Publisher backed by an `rdkafka` asynchronous producer.
pub struct KafkaPublisher {
    producer: FutureProducer,
    topic: String,
}

impl KafkaPublisher {
    /// Creates a producer against the given bootstrap endpoint and topic.
    pub fn new(brokers: &str, topic: impl Into<String>) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| PublishError::Producer(e.to_string()))?;
        Ok(Self {
            producer,
            topic: topic.into(),
        })
    }

    /// Topic this publisher sends to.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, payload: &[u8], key: &str) -> Result<(), PublishError> {
        let record = FutureRecord::to(&self.topic).payload(payload).key(key);
        let (partition, offset) = self
            .producer
            .send(record, Duration::from_secs(0))
            .await
            .map_err(|(e, _)| PublishError::Delivery(e.to_string()))?;
        tracing::debug!(topic = %self.topic, partition, offset, "delivered");
        Ok(())
    }
}
