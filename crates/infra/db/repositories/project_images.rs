use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, dsl::count_star, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::project_images};
use domain::{
    entities::project_images::{InsertProjectImageEntity, ProjectImageEntity},
    repositories::project_images::ProjectImageRepository,
    value_objects::enums::image_processing_statuses::ImageProcessingStatus,
};

pub struct ProjectImagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProjectImagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProjectImageRepository for ProjectImagePostgres {
    async fn list_by_project(&self, project_id: Uuid) -> Result<Vec<ProjectImageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = project_images::table
            .filter(project_images::project_id.eq(project_id))
            .order(project_images::created_at.asc())
            .select(ProjectImageEntity::as_select())
            .load::<ProjectImageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_by_project(&self, project_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = project_images::table
            .filter(project_images::project_id.eq(project_id))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(count)
    }

    async fn find_in_project(
        &self,
        project_id: Uuid,
        image_id: Uuid,
    ) -> Result<Option<ProjectImageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let image = project_images::table
            .filter(project_images::id.eq(image_id))
            .filter(project_images::project_id.eq(project_id))
            .select(ProjectImageEntity::as_select())
            .first::<ProjectImageEntity>(&mut conn)
            .optional()?;

        Ok(image)
    }

    async fn insert_image(
        &self,
        insert_project_image_entity: InsertProjectImageEntity,
    ) -> Result<ProjectImageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let image = insert_into(project_images::table)
            .values(&insert_project_image_entity)
            .returning(ProjectImageEntity::as_returning())
            .get_result::<ProjectImageEntity>(&mut conn)?;

        Ok(image)
    }

    async fn list_completed_with_output(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<ProjectImageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = project_images::table
            .filter(project_images::project_id.eq(project_id))
            .filter(
                project_images::processing_status
                    .eq(ImageProcessingStatus::Completed.to_string()),
            )
            .filter(project_images::processed_url.is_not_null())
            .order(project_images::created_at.asc())
            .select(ProjectImageEntity::as_select())
            .load::<ProjectImageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn delete_in_project(&self, project_id: Uuid, image_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(
            project_images::table
                .filter(project_images::id.eq(image_id))
                .filter(project_images::project_id.eq(project_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
