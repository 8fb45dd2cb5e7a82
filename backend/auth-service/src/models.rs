use auth_middleware::{Identity, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account record held by the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Public shape returned by the verify endpoint.
    pub fn to_identity(&self) -> Identity {
        Identity {
            subject_id: self.id,
            email: self.email.clone(),
            role: self.role,
            active: self.is_active,
        }
    }
}
