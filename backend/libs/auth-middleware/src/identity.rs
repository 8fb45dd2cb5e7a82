use std::fmt;

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Role carried by a verified credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// Verified result of a credential.
///
/// Attached to a request's extensions by [`crate::RemoteAuth`] for the
/// lifetime of that request only; never cached across requests and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "id")]
    pub subject_id: Uuid,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Identity>() {
            Some(identity) => ready(Ok(identity.clone())),
            None => ready(Err(AuthError::MissingCredential.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_serializes_subject_id_as_id() {
        let identity = Identity {
            subject_id: Uuid::new_v4(),
            email: "ops@batterypassport.dev".to_string(),
            role: Role::Admin,
            active: true,
        };

        let value = serde_json::to_value(&identity).unwrap();
        assert_eq!(value["id"], identity.subject_id.to_string());
        assert_eq!(value["role"], "admin");
    }

    #[test]
    fn role_parses_from_lowercase() {
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }
}
