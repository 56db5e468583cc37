use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::user::{Credentials, ProfilePatch, User};

/// Result of a write that can collide on the unique email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWrite {
    Saved(User),
    EmailTaken,
    Missing,
}

/// Identity store. Every `User` it returns carries the owned-document list
/// in insertion order.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> anyhow::Result<UserWrite>;
    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<Credentials>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;
    async fn update_profile(&self, id: Uuid, patch: &ProfilePatch) -> anyhow::Result<UserWrite>;
}
