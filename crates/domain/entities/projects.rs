use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::{
        packages::Package, project_statuses::ProjectStatus, video_statuses::VideoStatus,
    },
    infra::db::postgres::schema::projects,
};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = projects)]
pub struct ProjectEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub global_instructions: Option<String>,
    pub package: String,
    pub status: String,
    pub ai_description: Option<String>,
    pub video_url: Option<String>,
    pub video_status: Option<String>,
    pub selected_images: Option<serde_json::Value>,
    pub processing_progress: Option<i32>,
    pub billing_log: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProjectEntity {
    pub fn package(&self) -> Package {
        Package::from_stored(&self.package)
    }

    pub fn status(&self) -> ProjectStatus {
        ProjectStatus::from_str(&self.status)
    }

    pub fn video_status(&self) -> VideoStatus {
        match self.video_status.as_deref() {
            Some("processing") => VideoStatus::Processing,
            Some("completed") => VideoStatus::Completed,
            Some("failed") => VideoStatus::Failed,
            _ => VideoStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct InsertProjectEntity {
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub global_instructions: Option<String>,
    pub package: String,
    pub status: String,
    pub ai_description: Option<String>,
}
