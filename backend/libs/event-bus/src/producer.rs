use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use serde::Serialize;
use tracing::{debug, info};

use crate::envelope::EventEnvelope;
use crate::error::EventBusError;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);
const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Kafka producer owned by exactly one service process.
///
/// Constructed during startup, before the service accepts traffic, and
/// handed to producer bindings by the owner. A connect failure aborts
/// startup: the service must not serve requests with a broken event path.
pub struct EventProducer {
    producer: FutureProducer,
    key_seq: AtomicU64,
}

impl EventProducer {
    /// Creates the producer and verifies the broker is reachable.
    pub async fn connect(brokers: &str, client_id: &str) -> Result<Self, EventBusError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("client.id", client_id)
            .set("message.timeout.ms", "5000")
            .set("request.timeout.ms", "5000")
            .set("acks", "all")
            .create()
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        // librdkafka connects lazily; a metadata fetch forces the handshake
        // so an unreachable broker fails startup instead of the first publish.
        producer
            .client()
            .fetch_metadata(None, METADATA_TIMEOUT)
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        info!(brokers, client_id, "Kafka producer connected");

        Ok(Self {
            producer,
            key_seq: AtomicU64::new(0),
        })
    }

    /// Next producer-local partition key.
    ///
    /// Monotonic within this process only; it carries no application
    /// identity, so ordering across producers or restarts is not implied.
    pub fn next_key(&self) -> String {
        self.key_seq.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// Serializes `payload` and sends it to `topic`, returning once the
    /// broker acknowledges receipt. Does not wait for consumer processing.
    pub async fn publish<T: Serialize>(
        &self,
        topic: &str,
        key: &str,
        payload: &T,
    ) -> Result<(), EventBusError> {
        let value = serde_json::to_vec(payload)?;
        let record = FutureRecord::to(topic).key(key).payload(&value);

        self.producer
            .send(record, SEND_TIMEOUT)
            .await
            .map_err(|(e, _)| EventBusError::Publish {
                topic: topic.to_string(),
                reason: e.to_string(),
            })?;

        debug!(topic, key, "event published");
        Ok(())
    }

    pub async fn publish_envelope(&self, envelope: &EventEnvelope) -> Result<(), EventBusError> {
        self.publish(&envelope.topic, &envelope.key, &envelope.payload)
            .await
    }

    /// Drains in-flight messages before shutdown.
    pub fn flush(&self, timeout: Duration) -> Result<(), EventBusError> {
        self.producer
            .flush(timeout)
            .map_err(|e| EventBusError::Connection(e.to_string()))
    }
}
