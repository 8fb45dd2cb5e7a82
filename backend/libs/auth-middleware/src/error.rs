use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by credential verification and role checks.
///
/// None of these are retried automatically. `AuthorityUnreachable` and
/// `InvalidCredential` are distinguishable in logs but yield the same
/// externally observable rejection.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no bearer credential in request")]
    MissingCredential,

    #[error("credential rejected")]
    InvalidCredential,

    #[error("credential expired")]
    ExpiredCredential,

    #[error("authority unreachable: {0}")]
    AuthorityUnreachable(String),

    #[error("role not permitted for this route")]
    RoleDenied,
}

impl AuthError {
    /// Machine-readable reason carried in the HTTP response body.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "No token provided",
            AuthError::InvalidCredential => "Invalid token",
            AuthError::ExpiredCredential => "Token expired",
            AuthError::AuthorityUnreachable(_) => "Authentication failed",
            AuthError::RoleDenied => "Insufficient permissions",
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::RoleDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.reason() }))
    }
}
