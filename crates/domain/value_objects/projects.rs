use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{project_images::ProjectImageEntity, projects::ProjectEntity},
    value_objects::enums::{
        image_processing_statuses::ImageProcessingStatus, packages::Package,
        project_statuses::ProjectStatus, video_statuses::VideoStatus,
    },
};

pub const FREE_TRIAL_PROJECT_NAME: &str = "Free Trial Project";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub global_instructions: Option<String>,
    pub package: Package,
    pub status: ProjectStatus,
    pub ai_description: Option<String>,
    pub video_url: Option<String>,
    pub video_status: VideoStatus,
    pub processing_progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ProjectEntity> for ProjectModel {
    fn from(value: ProjectEntity) -> Self {
        Self {
            package: value.package(),
            status: value.status(),
            video_status: value.video_status(),
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            address: value.address,
            global_instructions: value.global_instructions,
            ai_description: value.ai_description,
            video_url: value.video_url,
            processing_progress: value.processing_progress.unwrap_or(0),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectImageModel {
    pub id: Uuid,
    pub project_id: Uuid,
    pub original_filename: String,
    pub processed_url: Option<String>,
    pub aspect_ratio: Option<String>,
    pub attempt_number: i32,
    pub processing_status: ImageProcessingStatus,
    pub tweak_history: Vec<String>,
    pub ai_prompt_used: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
}

impl From<ProjectImageEntity> for ProjectImageModel {
    fn from(value: ProjectImageEntity) -> Self {
        Self {
            processing_status: value.processing_status(),
            id: value.id,
            project_id: value.project_id,
            original_filename: value.original_filename,
            processed_url: value.processed_url,
            aspect_ratio: value.aspect_ratio,
            attempt_number: value.attempt_number,
            tweak_history: value.tweak_history,
            ai_prompt_used: value.ai_prompt_used,
            processed_at: value.processed_at,
            created_at: value.created_at,
            display_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectDetailsModel {
    pub project: ProjectModel,
    pub images: Vec<ProjectImageModel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreUploadedImage {
    #[serde(default)]
    pub url: String,
    pub filename: Option<String>,
}

impl PreUploadedImage {
    /// Explicit filename, else the last path segment of the URL.
    pub fn file_name(&self) -> String {
        match self.filename.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.url.rsplit('/').next().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectModel {
    pub project_name: Option<String>,
    pub address: Option<String>,
    pub global_instructions: Option<String>,
    pub selected_package: Option<String>,
    pub ai_description: Option<String>,
    pub project_id: Option<String>,
    #[serde(default)]
    pub is_adding_to_existing: bool,
    #[serde(default)]
    pub pre_uploaded_images: Vec<PreUploadedImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedProjectModel {
    pub id: Uuid,
    pub name: String,
    pub package: Package,
}

/// Columns a project owner may edit inline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectField {
    Name,
    Address,
    GlobalInstructions,
    AiDescription,
}

impl ProjectField {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "name" => Some(ProjectField::Name),
            "address" => Some(ProjectField::Address),
            "global_instructions" | "globalInstructions" => Some(ProjectField::GlobalInstructions),
            "ai_description" | "aiDescription" => Some(ProjectField::AiDescription),
            _ => None,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, ProjectField::Name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateProjectFieldModel {
    pub field: String,
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_uploaded_image_falls_back_to_url_segment() {
        let image = PreUploadedImage {
            url: "https://cdn.example.com/original/Loft_01.jpg".into(),
            filename: None,
        };
        assert_eq!(image.file_name(), "Loft_01.jpg");

        let named = PreUploadedImage {
            url: "ignored".into(),
            filename: Some("Custom.png".into()),
        };
        assert_eq!(named.file_name(), "Custom.png");
    }

    #[test]
    fn create_project_body_uses_camel_case() {
        let body: CreateProjectModel = serde_json::from_value(serde_json::json!({
            "projectName": "Loft",
            "selectedPackage": "pro",
            "isAddingToExisting": false,
            "preUploadedImages": [{ "url": "a/b.jpg" }]
        }))
        .unwrap();

        assert_eq!(body.project_name.as_deref(), Some("Loft"));
        assert_eq!(body.selected_package.as_deref(), Some("pro"));
        assert_eq!(body.pre_uploaded_images.len(), 1);
    }

    #[test]
    fn project_field_accepts_both_casings() {
        assert_eq!(
            ProjectField::from_str("aiDescription"),
            Some(ProjectField::AiDescription)
        );
        assert_eq!(ProjectField::from_str("status"), None);
    }
}
