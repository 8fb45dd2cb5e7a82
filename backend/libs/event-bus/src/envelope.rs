use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Topic taxonomy for passport lifecycle events.
pub mod topics {
    pub const PASSPORT_CREATED: &str = "passport.created";
    pub const PASSPORT_UPDATED: &str = "passport.updated";
    pub const PASSPORT_DELETED: &str = "passport.deleted";
}

/// Unit of data published to and consumed from the event bus.
///
/// The message value on the wire is the JSON-encoded `payload`; `key` is
/// used only for partition affinity, never for application identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub topic: String,
    pub key: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

impl EventEnvelope {
    pub fn new(topic: impl Into<String>, key: impl Into<String>, payload: Value) -> Self {
        Self {
            topic: topic.into(),
            key: key.into(),
            payload,
            timestamp: Utc::now(),
        }
    }
}

/// Payload of `passport.created`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportCreated {
    pub passport_id: Uuid,
    pub battery_identifier: String,
    pub created_by: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload of `passport.updated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportUpdated {
    pub passport_id: Uuid,
    pub battery_identifier: String,
    pub updated_by: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload of `passport.deleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportDeleted {
    pub passport_id: Uuid,
    pub battery_identifier: String,
    pub deleted_by: String,
    pub timestamp: DateTime<Utc>,
}
