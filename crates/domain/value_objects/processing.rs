use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::processing_queue::InsertProcessingRequestEntity,
    value_objects::enums::{operation_types::OperationType, packages::Package},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialProcessingPayload {
    pub global_instructions: String,
    pub attempt_number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TweakPayload {
    pub instruction: String,
    pub attempt_number: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoGenerationPayload {
    pub package: Package,
    pub image_count: usize,
    pub project_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TweakRequestModel {
    pub instruction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnqueuedModel {
    pub project_id: Uuid,
    pub queued: usize,
}

fn request(
    project_id: Uuid,
    image_id: Option<Uuid>,
    operation_type: OperationType,
    payload: impl Serialize,
) -> InsertProcessingRequestEntity {
    InsertProcessingRequestEntity {
        project_id,
        image_id,
        operation_type: operation_type.to_string(),
        payload: serde_json::to_value(payload).unwrap_or_default(),
    }
}

pub fn initial_processing_request(
    project_id: Uuid,
    image_id: Uuid,
    payload: InitialProcessingPayload,
) -> InsertProcessingRequestEntity {
    request(
        project_id,
        Some(image_id),
        OperationType::InitialProcessing,
        payload,
    )
}

pub fn tweak_request(
    project_id: Uuid,
    image_id: Uuid,
    payload: TweakPayload,
) -> InsertProcessingRequestEntity {
    request(project_id, Some(image_id), OperationType::Tweak, payload)
}

pub fn video_generation_request(
    project_id: Uuid,
    payload: VideoGenerationPayload,
) -> InsertProcessingRequestEntity {
    request(project_id, None, OperationType::VideoGeneration, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_request_has_no_image_and_snake_case_payload() {
        let project_id = Uuid::new_v4();
        let row = video_generation_request(
            project_id,
            VideoGenerationPayload {
                package: Package::Pro,
                image_count: 12,
                project_name: "Loft".into(),
            },
        );

        assert_eq!(row.image_id, None);
        assert_eq!(row.operation_type, "video_generation");
        assert_eq!(
            row.payload,
            json!({ "package": "pro", "image_count": 12, "project_name": "Loft" })
        );
    }

    #[test]
    fn tweak_request_carries_next_attempt() {
        let row = tweak_request(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TweakPayload {
                instruction: "brighter sky".into(),
                attempt_number: 3,
            },
        );

        assert_eq!(row.operation_type, "tweak");
        assert_eq!(
            row.payload,
            json!({ "instruction": "brighter sky", "attempt_number": 3 })
        );
    }
}
