//! Credential verification and auth delegation for the battery passport
//! services.
//!
//! Downstream services never validate credentials locally: every protected
//! route delegates to the auth service through [`RemoteAuth`], which calls
//! `GET /api/auth/verify` on the authority and attaches the resulting
//! [`Identity`] to the request. [`verify_local`] is the authority's own
//! signature + expiry check.

pub mod error;
pub mod identity;
pub mod middleware;
pub mod role;
pub mod verifier;

pub use error::AuthError;
pub use identity::{Identity, Role};
pub use middleware::RemoteAuth;
pub use role::RequireRole;
pub use verifier::{bearer_token, verify_local, Claims, RemoteVerifier};
