//! Authority for the battery passport platform.
//!
//! Exposes `GET /api/auth/verify`, which downstream services call for
//! every protected request. Verification is a local signature + expiry
//! check overlaid with account state from the user store. Token issuance
//! is handled elsewhere.

use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod models;
pub mod store;

use config::Config;
use store::UserStore;

/// Shared application state for the HTTP workers.
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
}
