use std::sync::Arc;

use crates::domain::{
    entities::projects::ProjectEntity,
    repositories::{
        processing_queue::ProcessingQueueRepository, project_images::ProjectImageRepository,
        projects::ProjectRepository,
    },
    value_objects::{
        payment_gate::{GateDecision, GateOperation, GateRejection, GateSubject, evaluate},
        processing::{
            EnqueuedModel, InitialProcessingPayload, TweakPayload, VideoGenerationPayload,
            initial_processing_request, tweak_request, video_generation_request,
        },
    },
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Project not found or access denied")]
    ProjectNotFound,
    #[error("Image not found")]
    ImageNotFound,
    #[error("Tweak instruction is required")]
    EmptyInstruction,
    #[error("Image was changed by another request, please retry")]
    TweakConflict,
    #[error("Payment required")]
    PaymentRequired { redirect: String },
    #[error("{}", .0.message())]
    Rejected(GateRejection),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ProcessingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ProcessingError::ProjectNotFound | ProcessingError::ImageNotFound => {
                StatusCode::NOT_FOUND
            }
            ProcessingError::EmptyInstruction => StatusCode::BAD_REQUEST,
            ProcessingError::PaymentRequired { .. } => StatusCode::PAYMENT_REQUIRED,
            ProcessingError::Rejected(GateRejection::AttemptLimitReached)
            | ProcessingError::TweakConflict => StatusCode::CONFLICT,
            ProcessingError::Rejected(_) => StatusCode::BAD_REQUEST,
            ProcessingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Internal(source) => AppError::Internal(source),
            ProcessingError::PaymentRequired { redirect } => AppError::PaymentRequired {
                message: "Payment required".to_string(),
                redirect,
            },
            ProcessingError::Rejected(GateRejection::AttemptLimitReached)
            | ProcessingError::TweakConflict => AppError::Conflict(err.to_string()),
            ProcessingError::ProjectNotFound | ProcessingError::ImageNotFound => {
                AppError::NotFound(err.to_string())
            }
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

fn check_gate(project: &ProjectEntity, operation: GateOperation) -> Result<(), ProcessingError> {
    match evaluate(&GateSubject::from(project), operation) {
        GateDecision::Allowed => Ok(()),
        GateDecision::RedirectToPayment { payment_path } => {
            info!(project_id = %project.id, ?operation, "processing: payment required");
            Err(ProcessingError::PaymentRequired {
                redirect: payment_path,
            })
        }
        GateDecision::Rejected(reason) => {
            warn!(project_id = %project.id, ?operation, ?reason, "processing: request rejected");
            Err(ProcessingError::Rejected(reason))
        }
    }
}

/// Queues work for the external image/video worker after the payment gate.
pub struct ProcessingUseCase<P, I, Q>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    Q: ProcessingQueueRepository + Send + Sync + 'static,
{
    project_repo: Arc<P>,
    image_repo: Arc<I>,
    queue_repo: Arc<Q>,
}

impl<P, I, Q> ProcessingUseCase<P, I, Q>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    Q: ProcessingQueueRepository + Send + Sync + 'static,
{
    pub fn new(project_repo: Arc<P>, image_repo: Arc<I>, queue_repo: Arc<Q>) -> Self {
        Self {
            project_repo,
            image_repo,
            queue_repo,
        }
    }

    async fn owned_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<ProjectEntity, ProcessingError> {
        self.project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(ProcessingError::ProjectNotFound)
    }

    pub async fn generate_all_images(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<EnqueuedModel, ProcessingError> {
        let project = self.owned_project(user_id, project_id).await?;
        let images = self.image_repo.list_by_project(project_id).await?;

        check_gate(
            &project,
            GateOperation::GenerateAll {
                image_count: images.len(),
            },
        )?;

        let global_instructions = project.global_instructions.clone().unwrap_or_default();
        let requests = images
            .iter()
            .map(|image| {
                initial_processing_request(
                    project_id,
                    image.id,
                    InitialProcessingPayload {
                        global_instructions: global_instructions.clone(),
                        attempt_number: image.attempt_number + 1,
                    },
                )
            })
            .collect();

        let queued = self
            .queue_repo
            .enqueue_initial_processing(project_id, requests)
            .await?;

        info!(%user_id, %project_id, queued, "processing: images queued");
        Ok(EnqueuedModel { project_id, queued })
    }

    pub async fn submit_tweak(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        image_id: Uuid,
        instruction: &str,
    ) -> Result<EnqueuedModel, ProcessingError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(ProcessingError::EmptyInstruction);
        }

        let project = self.owned_project(user_id, project_id).await?;
        let image = self
            .image_repo
            .find_in_project(project_id, image_id)
            .await?
            .ok_or(ProcessingError::ImageNotFound)?;

        check_gate(
            &project,
            GateOperation::Tweak {
                attempt_number: image.attempt_number,
            },
        )?;

        let next_attempt = image.attempt_number + 1;
        let mut tweak_history = image.tweak_history;
        tweak_history.push(instruction.to_string());

        let queued = self
            .queue_repo
            .enqueue_tweak(
                tweak_request(
                    project_id,
                    image_id,
                    TweakPayload {
                        instruction: instruction.to_string(),
                        attempt_number: next_attempt,
                    },
                ),
                image_id,
                image.attempt_number,
                tweak_history,
            )
            .await?;
        if !queued {
            warn!(%user_id, %project_id, %image_id, "processing: tweak lost attempt race");
            return Err(ProcessingError::TweakConflict);
        }

        info!(%user_id, %project_id, %image_id, attempt = next_attempt, "processing: tweak queued");
        Ok(EnqueuedModel {
            project_id,
            queued: 1,
        })
    }

    pub async fn generate_video(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<EnqueuedModel, ProcessingError> {
        let project = self.owned_project(user_id, project_id).await?;
        check_gate(&project, GateOperation::GenerateVideo)?;

        let image_count = self.image_repo.count_by_project(project_id).await? as usize;
        let request = video_generation_request(
            project_id,
            VideoGenerationPayload {
                package: project.package(),
                image_count,
                project_name: project.name.clone(),
            },
        );

        self.queue_repo
            .enqueue_video_generation(project_id, request)
            .await?;

        info!(%user_id, %project_id, image_count, "processing: video queued");
        Ok(EnqueuedModel {
            project_id,
            queued: 1,
        })
    }
}
