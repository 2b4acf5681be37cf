use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crates::domain::{
    repositories::{
        project_images::ProjectImageRepository, projects::ProjectRepository,
        storage::ImageStorageClient,
    },
    value_objects::{
        confirmations::{DEFAULT_CONFIRM_TIMEOUT, DeletionTarget, PressOutcome, TwoStepConfirm},
        storage::original_key,
    },
};
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("Project not found or access denied")]
    ProjectNotFound,
    #[error("Image not found")]
    ImageNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DeletionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DeletionError::ProjectNotFound | DeletionError::ImageNotFound => StatusCode::NOT_FOUND,
            DeletionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DeletionError> for AppError {
    fn from(err: DeletionError) -> Self {
        match err {
            DeletionError::Internal(source) => AppError::Internal(source),
            other => AppError::NotFound(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DeletionOutcome {
    ConfirmRequired {
        confirm_required: bool,
        expires_in_ms: u64,
    },
    Deleted {
        deleted: bool,
    },
}

impl DeletionOutcome {
    fn confirm_required(timeout: Duration) -> Self {
        DeletionOutcome::ConfirmRequired {
            confirm_required: true,
            expires_in_ms: timeout.as_millis() as u64,
        }
    }
}

/// Pending two-step confirmations per user and target.
pub struct DestructiveConfirmations {
    timeout: Duration,
    pending: Mutex<HashMap<(Uuid, DeletionTarget), TwoStepConfirm>>,
}

impl Default for DestructiveConfirmations {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_TIMEOUT)
    }
}

impl DestructiveConfirmations {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn press(&self, user_id: Uuid, target: DeletionTarget) -> PressOutcome {
        let now = Instant::now();
        let mut pending = self.lock();
        pending.retain(|_, confirm| confirm.is_armed(now));

        let outcome = pending
            .entry((user_id, target))
            .or_insert_with(|| TwoStepConfirm::new(self.timeout))
            .press(now);

        if outcome == PressOutcome::Confirmed {
            pending.remove(&(user_id, target));
        }
        outcome
    }

    /// Returns true when an arm was pending.
    pub fn cancel(&self, user_id: Uuid, target: DeletionTarget) -> bool {
        let now = Instant::now();
        match self.lock().remove(&(user_id, target)) {
            Some(mut confirm) => {
                let was_armed = confirm.is_armed(now);
                confirm.cancel();
                was_armed
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(Uuid, DeletionTarget), TwoStepConfirm>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct DeletionUseCase<P, I, S>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    project_repo: Arc<P>,
    image_repo: Arc<I>,
    storage: Arc<S>,
    confirmations: Arc<DestructiveConfirmations>,
}

impl<P, I, S> DeletionUseCase<P, I, S>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    pub fn new(
        project_repo: Arc<P>,
        image_repo: Arc<I>,
        storage: Arc<S>,
        confirmations: Arc<DestructiveConfirmations>,
    ) -> Self {
        Self {
            project_repo,
            image_repo,
            storage,
            confirmations,
        }
    }

    pub async fn delete_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<DeletionOutcome, DeletionError> {
        self.project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(DeletionError::ProjectNotFound)?;

        let target = DeletionTarget::Project { project_id };
        if self.confirmations.press(user_id, target) == PressOutcome::NeedsConfirmation {
            return Ok(DeletionOutcome::confirm_required(self.confirmations.timeout()));
        }

        if !self.project_repo.delete_owned(user_id, project_id).await? {
            return Err(DeletionError::ProjectNotFound);
        }

        info!(%user_id, %project_id, "deletions: project deleted");
        Ok(DeletionOutcome::Deleted { deleted: true })
    }

    pub async fn delete_image(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        image_id: Uuid,
    ) -> Result<DeletionOutcome, DeletionError> {
        self.project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(DeletionError::ProjectNotFound)?;

        let image = self
            .image_repo
            .find_in_project(project_id, image_id)
            .await?
            .ok_or(DeletionError::ImageNotFound)?;

        let target = DeletionTarget::Image {
            project_id,
            image_id,
        };
        if self.confirmations.press(user_id, target) == PressOutcome::NeedsConfirmation {
            return Ok(DeletionOutcome::confirm_required(self.confirmations.timeout()));
        }

        let key = original_key(&image.original_filename);
        if let Err(err) = self.storage.delete_object(&key).await {
            warn!(%project_id, %image_id, %key, storage_error = ?err, "deletions: storage delete failed, removing row anyway");
        }

        if !self.image_repo.delete_in_project(project_id, image_id).await? {
            return Err(DeletionError::ImageNotFound);
        }

        info!(%user_id, %project_id, %image_id, "deletions: image deleted");
        Ok(DeletionOutcome::Deleted { deleted: true })
    }

    pub fn cancel(&self, user_id: Uuid, target: DeletionTarget) -> bool {
        self.confirmations.cancel(user_id, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures::{sample_image, sample_project};
    use crates::domain::{
        repositories::{
            project_images::MockProjectImageRepository, projects::MockProjectRepository,
            storage::MockImageStorageClient,
        },
        value_objects::enums::{packages::Package, project_statuses::ProjectStatus},
    };
    use mockall::predicate::eq;

    fn owning_projects(project_id: Uuid) -> MockProjectRepository {
        let mut projects = MockProjectRepository::new();
        projects.expect_find_owned().returning(move |user_id, _| {
            let mut project = sample_project(user_id, Package::Pro, ProjectStatus::Draft);
            project.id = project_id;
            Box::pin(async move { Ok(Some(project)) })
        });
        projects
    }

    #[tokio::test(start_paused = true)]
    async fn project_is_deleted_only_on_second_press() {
        let user_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();
        let mut projects = owning_projects(project_id);
        projects
            .expect_delete_owned()
            .with(eq(user_id), eq(project_id))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(true) }));

        let usecase = DeletionUseCase::new(
            Arc::new(projects),
            Arc::new(MockProjectImageRepository::new()),
            Arc::new(MockImageStorageClient::new()),
            Arc::new(DestructiveConfirmations::default()),
        );

        let first = usecase.delete_project(user_id, project_id).await.unwrap();
        assert_eq!(
            first,
            DeletionOutcome::ConfirmRequired {
                confirm_required: true,
                expires_in_ms: 3000
            }
        );

        tokio::time::advance(Duration::from_millis(1500)).await;
        let second = usecase.delete_project(user_id, project_id).await.unwrap();
        assert_eq!(second, DeletionOutcome::Deleted { deleted: true });
    }

    #[tokio::test(start_paused = true)]
    async fn expired_arm_asks_again() {
        let user_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();
        let mut projects = owning_projects(project_id);
        projects.expect_delete_owned().never();

        let usecase = DeletionUseCase::new(
            Arc::new(projects),
            Arc::new(MockProjectImageRepository::new()),
            Arc::new(MockImageStorageClient::new()),
            Arc::new(DestructiveConfirmations::default()),
        );

        usecase.delete_project(user_id, project_id).await.unwrap();
        tokio::time::advance(Duration::from_millis(3000)).await;
        let again = usecase.delete_project(user_id, project_id).await.unwrap();

        assert!(matches!(again, DeletionOutcome::ConfirmRequired { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_disarms_pending_delete() {
        let user_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();
        let mut projects = owning_projects(project_id);
        projects.expect_delete_owned().never();

        let usecase = DeletionUseCase::new(
            Arc::new(projects),
            Arc::new(MockProjectImageRepository::new()),
            Arc::new(MockImageStorageClient::new()),
            Arc::new(DestructiveConfirmations::default()),
        );

        usecase.delete_project(user_id, project_id).await.unwrap();
        assert!(usecase.cancel(user_id, DeletionTarget::Project { project_id }));
        let again = usecase.delete_project(user_id, project_id).await.unwrap();

        assert!(matches!(again, DeletionOutcome::ConfirmRequired { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn image_row_is_removed_even_when_storage_delete_fails() {
        let user_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();
        let image = sample_image(project_id, 1);
        let image_id = image.id;
        let expected_key = format!("original/{}", image.original_filename);

        let mut images = MockProjectImageRepository::new();
        images.expect_find_in_project().returning(move |_, _| {
            let image = image.clone();
            Box::pin(async move { Ok(Some(image)) })
        });
        images
            .expect_delete_in_project()
            .with(eq(project_id), eq(image_id))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(true) }));

        let mut storage = MockImageStorageClient::new();
        storage
            .expect_delete_object()
            .withf(move |key| key == expected_key)
            .times(1)
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("bucket offline")) }));

        let usecase = DeletionUseCase::new(
            Arc::new(owning_projects(project_id)),
            Arc::new(images),
            Arc::new(storage),
            Arc::new(DestructiveConfirmations::default()),
        );

        usecase.delete_image(user_id, project_id, image_id).await.unwrap();
        let outcome = usecase.delete_image(user_id, project_id, image_id).await.unwrap();

        assert_eq!(outcome, DeletionOutcome::Deleted { deleted: true });
    }

    #[tokio::test(start_paused = true)]
    async fn arms_are_scoped_per_user() {
        let confirmations = DestructiveConfirmations::default();
        let target = DeletionTarget::Project {
            project_id: Uuid::new_v4(),
        };

        assert_eq!(
            confirmations.press(Uuid::new_v4(), target),
            PressOutcome::NeedsConfirmation
        );
        assert_eq!(
            confirmations.press(Uuid::new_v4(), target),
            PressOutcome::NeedsConfirmation
        );
    }
}
