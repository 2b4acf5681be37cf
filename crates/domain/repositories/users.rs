use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::{InsertUserEntity, UserEntity};

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;
    /// Returns true when a new profile row was written.
    async fn ensure_profile(&self, insert_user_entity: InsertUserEntity) -> Result<bool>;
    async fn mark_free_trial_used(&self, user_id: Uuid) -> Result<()>;
}
