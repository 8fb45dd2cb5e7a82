use actix_web::{web, HttpRequest, HttpResponse};
use auth_middleware::{bearer_token, verify_local, AuthError};
use chrono::Utc;
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// GET /api/auth/verify
///
/// Checks the bearer credential's signature and expiry, then overlays
/// account state from the user store: an unknown subject or a deactivated
/// account is rejected the same way as a bad signature.
pub async fn verify(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingCredential)?;
    let identity = verify_local(token, &state.config.jwt_secret)?;

    let user = state
        .users
        .find_by_id(identity.subject_id)
        .await
        .ok_or_else(|| {
            warn!(subject = %identity.subject_id, "token subject not found");
            AuthError::InvalidCredential
        })?;

    if !user.is_active {
        warn!(subject = %user.id, "token subject is deactivated");
        return Err(AuthError::InvalidCredential);
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Token verified successfully",
        "user": user.to_identity(),
    })))
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "service": "Auth Service",
        "timestamp": Utc::now(),
    }))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/auth").route("/verify", web::get().to(verify)));
}
