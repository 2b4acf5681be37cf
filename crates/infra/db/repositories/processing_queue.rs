use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain;
use crate::infra::db::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{processing_queue, project_images, projects},
};
use domain::{
    entities::processing_queue::InsertProcessingRequestEntity,
    repositories::processing_queue::ProcessingQueueRepository,
    value_objects::enums::{
        image_processing_statuses::ImageProcessingStatus, project_statuses::ProjectStatus,
        video_statuses::VideoStatus,
    },
};

pub struct ProcessingQueuePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ProcessingQueuePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ProcessingQueueRepository for ProcessingQueuePostgres {
    async fn enqueue_initial_processing(
        &self,
        project_id: Uuid,
        requests: Vec<InsertProcessingRequestEntity>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let queued = conn.transaction::<usize, diesel::result::Error, _>(|tx| {
            let queued = insert_into(processing_queue::table)
                .values(&requests)
                .execute(tx)?;

            update(projects::table)
                .filter(projects::id.eq(project_id))
                .set((
                    projects::status.eq(ProjectStatus::Processing.to_string()),
                    projects::updated_at.eq(Some(Utc::now())),
                ))
                .execute(tx)?;

            update(project_images::table)
                .filter(project_images::project_id.eq(project_id))
                .set(
                    project_images::processing_status
                        .eq(Some(ImageProcessingStatus::Pending.to_string())),
                )
                .execute(tx)?;

            Ok(queued)
        })?;

        Ok(queued)
    }

    async fn enqueue_tweak(
        &self,
        request: InsertProcessingRequestEntity,
        image_id: Uuid,
        expected_attempt: i32,
        tweak_history: Vec<String>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let queued = conn.transaction::<bool, diesel::result::Error, _>(|tx| {
            // Compare-and-set on the attempt counter; a concurrent tweak wins and this one writes nothing.
            let bumped = update(project_images::table)
                .filter(project_images::id.eq(image_id))
                .filter(project_images::attempt_number.eq(expected_attempt))
                .set((
                    project_images::attempt_number.eq(expected_attempt + 1),
                    project_images::tweak_history.eq(tweak_history),
                    project_images::processing_status
                        .eq(Some(ImageProcessingStatus::Pending.to_string())),
                ))
                .execute(tx)?;
            if bumped == 0 {
                return Ok(false);
            }

            insert_into(processing_queue::table)
                .values(&request)
                .execute(tx)?;

            Ok(true)
        })?;

        Ok(queued)
    }

    async fn enqueue_video_generation(
        &self,
        project_id: Uuid,
        request: InsertProcessingRequestEntity,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|tx| {
            update(projects::table)
                .filter(projects::id.eq(project_id))
                .set((
                    projects::status.eq(ProjectStatus::Filming.to_string()),
                    projects::video_status.eq(Some(VideoStatus::Processing.to_string())),
                    projects::updated_at.eq(Some(Utc::now())),
                ))
                .execute(tx)?;

            insert_into(processing_queue::table)
                .values(&request)
                .execute(tx)?;

            Ok(())
        })?;

        Ok(())
    }
}
