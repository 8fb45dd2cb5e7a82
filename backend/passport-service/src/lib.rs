//! Battery passport CRUD service.
//!
//! Every route delegates authentication to the auth service; mutating
//! routes additionally require the admin role. After a mutation commits,
//! the service publishes a lifecycle event (`passport.created`,
//! `passport.updated`, `passport.deleted`) on the event bus. Publish
//! failures are logged and swallowed: the committed mutation outranks
//! guaranteed notification delivery.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod models;
pub mod store;

use events::LifecycleEvents;
use store::PassportStore;

/// Shared application state for the HTTP workers.
pub struct AppState {
    pub store: Arc<dyn PassportStore>,
    pub events: Arc<dyn LifecycleEvents>,
}
