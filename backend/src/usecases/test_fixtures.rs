use chrono::Utc;
use crates::domain::{
    entities::{
        project_images::ProjectImageEntity, projects::ProjectEntity, users::UserEntity,
    },
    value_objects::enums::{
        image_processing_statuses::ImageProcessingStatus, packages::Package,
        project_statuses::ProjectStatus,
    },
};
use uuid::Uuid;

pub fn sample_user(user_id: Uuid, free_trial_used: bool) -> UserEntity {
    UserEntity {
        id: user_id,
        email: Some("agent@example.com".into()),
        free_trial_used: Some(free_trial_used),
        subscription_status: None,
        stripe_customer_id: None,
        created_at: Some(Utc::now()),
    }
}

pub fn sample_project(user_id: Uuid, package: Package, status: ProjectStatus) -> ProjectEntity {
    ProjectEntity {
        id: Uuid::new_v4(),
        user_id,
        name: "Villa Rosa".to_string(),
        address: Some("1 Harbour Road".to_string()),
        global_instructions: Some("warm evening light".to_string()),
        package: package.to_string(),
        status: status.to_string(),
        ai_description: None,
        video_url: None,
        video_status: Some("pending".to_string()),
        selected_images: None,
        processing_progress: Some(0),
        billing_log: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

pub fn sample_image(project_id: Uuid, attempt_number: i32) -> ProjectImageEntity {
    ProjectImageEntity {
        id: Uuid::new_v4(),
        project_id,
        original_filename: format!("Villa_Rosa_{:02}.jpg", attempt_number),
        processed_url: None,
        aspect_ratio: None,
        attempt_number,
        processing_status: Some(ImageProcessingStatus::Pending.to_string()),
        tweak_history: vec![String::new()],
        ai_prompt_used: None,
        image_metadata: None,
        processed_at: None,
        created_at: Utc::now(),
    }
}

pub fn completed_image(project_id: Uuid, processed: &str) -> ProjectImageEntity {
    ProjectImageEntity {
        processed_url: Some(processed.to_string()),
        processing_status: Some(ImageProcessingStatus::Completed.to_string()),
        ..sample_image(project_id, 2)
    }
}
