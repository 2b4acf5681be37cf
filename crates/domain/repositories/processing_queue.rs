use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::processing_queue::InsertProcessingRequestEntity;

/// Writes work for the external image/video worker. Each method updates the
/// queue and the affected rows in one transaction.
#[async_trait]
#[automock]
pub trait ProcessingQueueRepository {
    /// Queues every image, sets the project to `processing` and every image to `pending`.
    async fn enqueue_initial_processing(
        &self,
        project_id: Uuid,
        requests: Vec<InsertProcessingRequestEntity>,
    ) -> Result<usize>;
    /// Queues one tweak and bumps the image to `expected_attempt + 1`.
    /// Returns false, writing nothing, when the stored attempt is no longer `expected_attempt`.
    async fn enqueue_tweak(
        &self,
        request: InsertProcessingRequestEntity,
        image_id: Uuid,
        expected_attempt: i32,
        tweak_history: Vec<String>,
    ) -> Result<bool>;
    /// Queues the video job and moves the project to `filming`.
    async fn enqueue_video_generation(
        &self,
        project_id: Uuid,
        request: InsertProcessingRequestEntity,
    ) -> Result<()>;
}
