use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::image_processing_statuses::ImageProcessingStatus,
    infra::db::postgres::schema::project_images,
};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = project_images)]
pub struct ProjectImageEntity {
    pub id: Uuid,
    pub project_id: Uuid,
    pub original_filename: String,
    pub processed_url: Option<String>,
    pub aspect_ratio: Option<String>,
    pub attempt_number: i32,
    pub processing_status: Option<String>,
    pub tweak_history: Vec<String>,
    pub ai_prompt_used: Option<String>,
    pub image_metadata: Option<serde_json::Value>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ProjectImageEntity {
    pub fn processing_status(&self) -> ImageProcessingStatus {
        match self.processing_status.as_deref() {
            Some("processing") => ImageProcessingStatus::Processing,
            Some("completed") => ImageProcessingStatus::Completed,
            Some("failed") => ImageProcessingStatus::Failed,
            _ => ImageProcessingStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_images)]
pub struct InsertProjectImageEntity {
    pub project_id: Uuid,
    pub original_filename: String,
    pub attempt_number: i32,
    pub processing_status: Option<String>,
    pub tweak_history: Vec<String>,
}

impl InsertProjectImageEntity {
    /// Fresh upload: first attempt, no tweak instructions yet.
    pub fn first_attempt(project_id: Uuid, original_filename: String) -> Self {
        Self {
            project_id,
            original_filename,
            attempt_number: 1,
            processing_status: Some(ImageProcessingStatus::Pending.to_string()),
            tweak_history: vec![String::new()],
        }
    }
}
