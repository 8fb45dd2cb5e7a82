use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum PassportError {
    #[error("battery passport not found")]
    NotFound,

    #[error("battery passport already exists")]
    Duplicate,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for PassportError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => PassportError::NotFound,
            StoreError::DuplicateIdentifier => PassportError::Duplicate,
        }
    }
}

impl ResponseError for PassportError {
    fn status_code(&self) -> StatusCode {
        match self {
            PassportError::NotFound => StatusCode::NOT_FOUND,
            PassportError::Duplicate => StatusCode::CONFLICT,
            PassportError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            PassportError::NotFound => ("Passport not found", "Battery passport not found"),
            PassportError::Duplicate => (
                "Battery passport already exists",
                "A passport with this battery identifier already exists",
            ),
            PassportError::Internal(_) => ("Internal error", "Unable to process request"),
        };

        HttpResponse::build(self.status_code()).json(json!({
            "error": error,
            "message": message,
        }))
    }
}
