use std::time::Duration;

use actix_web::http::header::HeaderMap;
use jsonwebtoken::{decode, errors::ErrorKind, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::AuthError;
use crate::identity::{Identity, Role};

/// Claims carried by a signed bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Extracts the bearer token from an `Authorization` header, if present
/// and well-formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Local verification: HS256 signature + expiry against the shared secret.
///
/// Pure, no I/O, fails fast. Account state is not consulted here; callers
/// that need the `active` flag go through the authority, which overlays it
/// from the user store.
pub fn verify_local(token: &str, secret: &str) -> Result<Identity, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredCredential,
        _ => AuthError::InvalidCredential,
    })?;

    Ok(Identity {
        subject_id: data.claims.sub,
        email: data.claims.email,
        role: data.claims.role,
        active: true,
    })
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user: Identity,
}

/// Delegates credential verification to the authority over HTTP.
///
/// One synchronous call per request, bounded by the client timeout. There
/// is deliberately no retry here: retrying on every inbound request while
/// the authority is down would amplify load on a failing dependency.
#[derive(Clone)]
pub struct RemoteVerifier {
    client: reqwest::Client,
    verify_url: String,
}

impl RemoteVerifier {
    /// The timeout is load-bearing: without it a stalled authority would
    /// stall every protected request, so a client that cannot be built
    /// with it is a construction error, not a fallback.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            verify_url: format!("{}/api/auth/verify", base_url.trim_end_matches('/')),
        })
    }

    /// `GET <authority>/api/auth/verify` with the original bearer token.
    ///
    /// Non-2xx responses map to [`AuthError::InvalidCredential`];
    /// connection-level faults (timeout, refused, DNS) map to
    /// [`AuthError::AuthorityUnreachable`].
    pub async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .get(&self.verify_url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .map_err(|e| AuthError::AuthorityUnreachable(e.to_string()))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "authority rejected credential");
            return Err(AuthError::InvalidCredential);
        }

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| AuthError::AuthorityUnreachable(e.to_string()))?;

        Ok(body.user)
    }
}
