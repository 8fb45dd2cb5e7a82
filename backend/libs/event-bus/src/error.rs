use thiserror::Error;

/// Failures surfaced by the event bus client.
///
/// `Connection` is fatal at service startup. `Publish` is returned to the
/// caller, which decides whether to log and continue (producer bindings do,
/// since the triggering mutation has already committed).
#[derive(Debug, Error)]
pub enum EventBusError {
    #[error("broker connection failed: {0}")]
    Connection(String),

    #[error("publish to topic {topic} failed: {reason}")]
    Publish { topic: String, reason: String },

    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
