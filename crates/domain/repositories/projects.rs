use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::projects::{InsertProjectEntity, ProjectEntity},
    value_objects::{enums::project_statuses::ProjectStatus, projects::ProjectField},
};

#[async_trait]
#[automock]
pub trait ProjectRepository {
    async fn create_project(&self, insert_project_entity: InsertProjectEntity)
    -> Result<ProjectEntity>;
    async fn find_owned(&self, user_id: Uuid, project_id: Uuid) -> Result<Option<ProjectEntity>>;
    async fn find_owned_draft(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectEntity>>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ProjectEntity>>;
    async fn update_status(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        status: ProjectStatus,
    ) -> Result<bool>;
    async fn update_field(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        field: ProjectField,
        value: Option<String>,
    ) -> Result<bool>;
    async fn delete_owned(&self, user_id: Uuid, project_id: Uuid) -> Result<bool>;
}
