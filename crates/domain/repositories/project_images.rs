use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::project_images::{InsertProjectImageEntity, ProjectImageEntity};

#[async_trait]
#[automock]
pub trait ProjectImageRepository {
    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<ProjectImageEntity>>;
    async fn count_by_project(&self, project_id: Uuid) -> Result<i64>;
    async fn find_in_project(
        &self,
        project_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<ProjectImageEntity>>;
    async fn insert_image(
        &self,
        insert_project_image_entity: InsertProjectImageEntity,
    ) -> Result<ProjectImageEntity>;
    /// Completed images that have a processed output, oldest first.
    async fn list_completed_with_output(&self, project_id: Uuid)
    -> Result<Vec<ProjectImageEntity>>;
    async fn delete_in_project(&self, project_id: Uuid, image_id: Uuid) -> Result<bool>;
}
