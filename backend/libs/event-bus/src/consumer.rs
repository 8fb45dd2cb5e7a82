use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::ClientConfig;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::EventBusError;

const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

type EventHandler = Box<dyn Fn(Value) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Registry of `(topic, handler)` bindings for one consumer-group
/// connection. Handlers are registered at service startup, then
/// [`EventConsumer::connect`] turns the registry into a running group
/// member.
pub struct EventConsumer {
    brokers: String,
    group_id: String,
    handlers: HashMap<String, EventHandler>,
}

impl EventConsumer {
    pub fn new(brokers: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            group_id: group_id.into(),
            handlers: HashMap::new(),
        }
    }

    /// Binds `handler` to `topic`. The handler is invoked once per received
    /// message with the deserialized payload, sequentially for this
    /// consumer. A handler error is logged and the loop moves on; the
    /// message is not redelivered.
    pub fn subscribe<F, Fut>(&mut self, topic: &str, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.handlers
            .insert(topic.to_string(), Box::new(move |payload| Box::pin(handler(payload))));
    }

    pub fn topics(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Invokes the registered handler for `topic` directly, applying the
    /// same catch-and-continue policy as the receive loop. Exposed so
    /// dispatch behavior can be exercised without a broker.
    pub async fn dispatch(&self, topic: &str, payload: Value) {
        dispatch(&self.handlers, topic, payload).await;
    }

    /// Joins the consumer group and subscribes to every registered topic.
    ///
    /// Fails with [`EventBusError::Connection`] when the broker is
    /// unreachable; the owning service treats that as fatal at startup.
    pub fn connect(self) -> Result<SubscribedConsumer, EventBusError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true")
            .set("session.timeout.ms", "30000")
            .set("heartbeat.interval.ms", "10000")
            .create()
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        consumer
            .client()
            .fetch_metadata(None, METADATA_TIMEOUT)
            .map_err(|e| EventBusError::Connection(e.to_string()))?;

        let topics = self.topics();
        consumer
            .subscribe(&topics)
            .map_err(|e| EventBusError::Subscribe(e.to_string()))?;

        info!(group_id = %self.group_id, ?topics, "Kafka consumer subscribed");

        Ok(SubscribedConsumer {
            consumer,
            handlers: self.handlers,
        })
    }
}

/// A connected consumer-group member. Dropping it leaves the group, which
/// is how the connection is released on shutdown.
pub struct SubscribedConsumer {
    consumer: StreamConsumer,
    handlers: HashMap<String, EventHandler>,
}

impl SubscribedConsumer {
    /// Receive loop: one message at a time, dispatched to the handler
    /// registered for its topic. Runs until `shutdown` flips to `true`
    /// (or its sender is dropped).
    ///
    /// Offsets are auto-committed, so a failed handler invocation still
    /// consumes the message. Lost side effects are accepted here; they are
    /// only observable through the logs.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("consumer receive loop shutting down");
                        break;
                    }
                }
                msg = self.consumer.recv() => {
                    match msg {
                        Ok(m) => {
                            let topic = m.topic().to_string();
                            let Some(raw) = m.payload() else {
                                warn!(topic, "message without payload; skipping");
                                continue;
                            };
                            match serde_json::from_slice::<Value>(raw) {
                                Ok(payload) => dispatch(&self.handlers, &topic, payload).await,
                                Err(e) => {
                                    warn!(topic, error = %e, "undecodable message payload; skipping");
                                }
                            }
                        }
                        Err(e) => warn!("Kafka consumer error: {}", e),
                    }
                }
            }
        }
    }
}

async fn dispatch(handlers: &HashMap<String, EventHandler>, topic: &str, payload: Value) {
    let Some(handler) = handlers.get(topic) else {
        warn!(topic, "message for topic without a registered handler; skipping");
        return;
    };

    if let Err(e) = handler(payload).await {
        // No retry, no requeue: the offset is already considered consumed.
        error!(topic, error = %e, "event handler failed; continuing with next message");
    }
}
