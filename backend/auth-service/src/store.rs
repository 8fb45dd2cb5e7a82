use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::User;

/// Boundary to the account database.
///
/// The relational schema is an external collaborator; only the lookups
/// verification needs are specified here.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Option<User>;
    async fn insert(&self, user: User);
}

/// In-memory store used in development and tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.clone())
    }

    async fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }
}
