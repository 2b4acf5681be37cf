use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::projects};
use domain::{
    entities::projects::{InsertProjectEntity, ProjectEntity},
    repositories::projects::ProjectRepository,
    value_objects::{enums::project_statuses::ProjectStatus, projects::ProjectField},
};

pub struct ProjectPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProjectPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProjectRepository for ProjectPostgres {
    async fn create_project(
        &self,
        insert_project_entity: InsertProjectEntity,
    ) -> Result<ProjectEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let project = insert_into(projects::table)
            .values(&insert_project_entity)
            .returning(ProjectEntity::as_returning())
            .get_result::<ProjectEntity>(&mut conn)?;

        Ok(project)
    }

    async fn find_owned(&self, user_id: Uuid, project_id: Uuid) -> Result<Option<ProjectEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let project = projects::table
            .filter(projects::id.eq(project_id))
            .filter(projects::user_id.eq(user_id))
            .select(ProjectEntity::as_select())
            .first::<ProjectEntity>(&mut conn)
            .optional()?;

        Ok(project)
    }

    async fn find_owned_draft(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let project = projects::table
            .filter(projects::id.eq(project_id))
            .filter(projects::user_id.eq(user_id))
            .filter(projects::status.eq(ProjectStatus::Draft.to_string()))
            .select(ProjectEntity::as_select())
            .first::<ProjectEntity>(&mut conn)
            .optional()?;

        Ok(project)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<ProjectEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = projects::table
            .filter(projects::user_id.eq(user_id))
            .order(projects::created_at.desc())
            .select(ProjectEntity::as_select())
            .load::<ProjectEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        status: ProjectStatus,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(projects::table)
            .filter(projects::id.eq(project_id))
            .filter(projects::user_id.eq(user_id))
            .set((
                projects::status.eq(status.to_string()),
                projects::updated_at.eq(Some(Utc::now())),
            ))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn update_field(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        field: ProjectField,
        value: Option<String>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let target = projects::table
            .filter(projects::id.eq(project_id))
            .filter(projects::user_id.eq(user_id));
        let touched = projects::updated_at.eq(Some(Utc::now()));

        let updated = match field {
            ProjectField::Name => update(target)
                .set((projects::name.eq(value.unwrap_or_default()), touched))
                .execute(&mut conn)?,
            ProjectField::Address => update(target)
                .set((projects::address.eq(value), touched))
                .execute(&mut conn)?,
            ProjectField::GlobalInstructions => update(target)
                .set((projects::global_instructions.eq(value), touched))
                .execute(&mut conn)?,
            ProjectField::AiDescription => update(target)
                .set((projects::ai_description.eq(value), touched))
                .execute(&mut conn)?,
        };

        Ok(updated > 0)
    }

    async fn delete_owned(&self, user_id: Uuid, project_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(
            projects::table
                .filter(projects::id.eq(project_id))
                .filter(projects::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}
