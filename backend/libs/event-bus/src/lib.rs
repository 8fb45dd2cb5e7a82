//! Shared Kafka client for the battery passport services.
//!
//! One producer and/or one consumer-group connection per process, owned by
//! the service that constructed it and passed to producer/consumer bindings
//! explicitly. Connections are established at startup (a broker that is
//! unreachable at that point is fatal for the owning service) and released
//! on shutdown.

pub mod consumer;
pub mod envelope;
pub mod error;
pub mod producer;

pub use consumer::{EventConsumer, SubscribedConsumer};
pub use envelope::{topics, EventEnvelope, PassportCreated, PassportDeleted, PassportUpdated};
pub use error::EventBusError;
pub use producer::EventProducer;
