use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use event_bus::{
    topics, EventBusError, EventEnvelope, EventProducer, PassportCreated, PassportDeleted,
    PassportUpdated,
};
use uuid::Uuid;

use crate::models::BatteryPassport;

/// Lifecycle event publication, behind a trait so handlers can run without
/// a live broker in tests.
///
/// Envelopes are only constructed after the store mutation has committed.
/// Callers log and swallow the returned error: a publish failure must
/// never roll back or fail the committed mutation.
#[async_trait]
pub trait LifecycleEvents: Send + Sync {
    async fn passport_created(
        &self,
        passport: &BatteryPassport,
        actor: Uuid,
    ) -> Result<(), EventBusError>;

    async fn passport_updated(
        &self,
        passport: &BatteryPassport,
        actor: Uuid,
    ) -> Result<(), EventBusError>;

    async fn passport_deleted(
        &self,
        passport: &BatteryPassport,
        actor: Uuid,
    ) -> Result<(), EventBusError>;
}

/// Kafka-backed producer binding.
pub struct PassportEvents {
    producer: Arc<EventProducer>,
}

impl PassportEvents {
    pub fn new(producer: Arc<EventProducer>) -> Self {
        Self { producer }
    }

    async fn publish<T: serde::Serialize>(
        &self,
        topic: &str,
        event: &T,
    ) -> Result<(), EventBusError> {
        let envelope =
            EventEnvelope::new(topic, self.producer.next_key(), serde_json::to_value(event)?);
        self.producer.publish_envelope(&envelope).await
    }
}

#[async_trait]
impl LifecycleEvents for PassportEvents {
    async fn passport_created(
        &self,
        passport: &BatteryPassport,
        actor: Uuid,
    ) -> Result<(), EventBusError> {
        let event = PassportCreated {
            passport_id: passport.id,
            battery_identifier: passport.battery_identifier().to_string(),
            created_by: actor.to_string(),
            timestamp: Utc::now(),
        };
        self.publish(topics::PASSPORT_CREATED, &event).await
    }

    async fn passport_updated(
        &self,
        passport: &BatteryPassport,
        actor: Uuid,
    ) -> Result<(), EventBusError> {
        let event = PassportUpdated {
            passport_id: passport.id,
            battery_identifier: passport.battery_identifier().to_string(),
            updated_by: actor.to_string(),
            timestamp: Utc::now(),
        };
        self.publish(topics::PASSPORT_UPDATED, &event).await
    }

    async fn passport_deleted(
        &self,
        passport: &BatteryPassport,
        actor: Uuid,
    ) -> Result<(), EventBusError> {
        let event = PassportDeleted {
            passport_id: passport.id,
            battery_identifier: passport.battery_identifier().to_string(),
            deleted_by: actor.to_string(),
            timestamp: Utc::now(),
        };
        self.publish(topics::PASSPORT_DELETED, &event).await
    }
}
