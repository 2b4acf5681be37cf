use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crates::domain::{
    entities::project_images::InsertProjectImageEntity,
    repositories::{
        project_images::ProjectImageRepository, projects::ProjectRepository,
        storage::ImageStorageClient,
    },
    value_objects::{
        storage::StorageError,
        upload_tracker::{
            COMPLETED_VISIBLE_MS, ERROR_RETENTION_MS, FADE_OUT_MS, UploadEntry, UploadStatus,
        },
        uploads::{IncomingImage, UploadOutcome, stored_file_name, validate_batch},
    },
};
use futures_util::future::join_all;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No files provided")]
    NoFiles,
    #[error("Upload failed: {0}")]
    InvalidFiles(String),
    #[error("This project allows at most {limit} images ({existing} already uploaded)")]
    QuotaExceeded { limit: usize, existing: usize },
    #[error("Project not found or access denied")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UploadError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UploadError::NoFiles
            | UploadError::InvalidFiles(_)
            | UploadError::QuotaExceeded { .. } => StatusCode::BAD_REQUEST,
            UploadError::NotFound => StatusCode::NOT_FOUND,
            UploadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Internal(source) => AppError::Internal(source),
            UploadError::NotFound => AppError::NotFound(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// In-memory upload queue per project, read by the uploads endpoint.
#[derive(Default)]
pub struct UploadTracker {
    projects: Mutex<HashMap<Uuid, Vec<UploadEntry>>>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, project_id: Uuid) -> Vec<UploadEntry> {
        self.with_project(project_id, |entries| entries.clone())
            .unwrap_or_default()
    }

    /// Errors left over from the previous batch are dropped; entries still in flight stay.
    pub fn begin_batch(&self, project_id: Uuid, batch: &[UploadEntry]) {
        let mut projects = self.lock();
        let entries = projects.entry(project_id).or_default();
        entries.retain(|entry| !matches!(entry.status, UploadStatus::Error { .. }));
        entries.extend(batch.iter().cloned());
    }

    pub fn set_status(&self, project_id: Uuid, entry_id: Uuid, status: UploadStatus) {
        self.with_entry(project_id, entry_id, |entry| entry.set_status(status));
    }

    fn mark_fading(&self, project_id: Uuid, entry_id: Uuid) {
        self.with_entry(project_id, entry_id, |entry| entry.fading = true);
    }

    fn remove(&self, project_id: Uuid, entry_id: Uuid) {
        let mut projects = self.lock();
        if let Some(entries) = projects.get_mut(&project_id) {
            entries.retain(|entry| entry.id != entry_id);
            if entries.is_empty() {
                projects.remove(&project_id);
            }
        }
    }

    /// Completed entries fade after a short pause and are then dropped.
    pub fn schedule_removal(self: &Arc<Self>, project_id: Uuid, entry_id: Uuid) {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(COMPLETED_VISIBLE_MS)).await;
            tracker.mark_fading(project_id, entry_id);
            tokio::time::sleep(Duration::from_millis(FADE_OUT_MS)).await;
            tracker.remove(project_id, entry_id);
        });
    }

    /// Failed entries are kept for the user to read, but not past `ERROR_RETENTION_MS`.
    pub fn schedule_error_expiry(self: &Arc<Self>, project_id: Uuid, entry_id: Uuid) {
        let tracker = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ERROR_RETENTION_MS)).await;
            tracker.remove(project_id, entry_id);
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Vec<UploadEntry>>> {
        // A panicked holder leaves only display state behind.
        self.projects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_project<T>(
        &self,
        project_id: Uuid,
        f: impl FnOnce(&mut Vec<UploadEntry>) -> T,
    ) -> Option<T> {
        self.lock().get_mut(&project_id).map(f)
    }

    fn with_entry(&self, project_id: Uuid, entry_id: Uuid, f: impl FnOnce(&mut UploadEntry)) {
        self.with_project(project_id, |entries| {
            if let Some(entry) = entries.iter_mut().find(|entry| entry.id == entry_id) {
                f(entry);
            }
        });
    }
}

pub struct UploadUseCase<P, I, S>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    project_repo: Arc<P>,
    image_repo: Arc<I>,
    storage: Arc<S>,
    tracker: Arc<UploadTracker>,
}

impl<P, I, S> UploadUseCase<P, I, S>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    pub fn new(
        project_repo: Arc<P>,
        image_repo: Arc<I>,
        storage: Arc<S>,
        tracker: Arc<UploadTracker>,
    ) -> Self {
        Self {
            project_repo,
            image_repo,
            storage,
            tracker,
        }
    }

    pub async fn upload_images(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        files: Vec<IncomingImage>,
    ) -> Result<Vec<UploadOutcome>, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }

        if let Err(problems) = validate_batch(&files) {
            warn!(%user_id, %project_id, problems = ?problems, "uploads: batch rejected");
            return Err(UploadError::InvalidFiles(problems.join(", ")));
        }

        let project = self
            .project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(UploadError::NotFound)?;

        let limit = project.package().image_limit();
        let existing = self.image_repo.count_by_project(project_id).await? as usize;
        if existing + files.len() > limit {
            warn!(
                %user_id,
                %project_id,
                existing,
                incoming = files.len(),
                limit,
                "uploads: image quota exceeded"
            );
            return Err(UploadError::QuotaExceeded { limit, existing });
        }

        let entries: Vec<UploadEntry> = files
            .iter()
            .enumerate()
            .map(|(index, file)| {
                UploadEntry::queued(
                    file.file_name.clone(),
                    stored_file_name(&project.name, existing + index + 1, &file.file_name),
                )
            })
            .collect();
        self.tracker.begin_batch(project_id, &entries);

        let tasks = files.into_iter().zip(entries).map(|(file, entry)| {
            let image_repo = Arc::clone(&self.image_repo);
            let storage = Arc::clone(&self.storage);
            let tracker = Arc::clone(&self.tracker);
            tokio::spawn(async move {
                upload_one(image_repo, storage, tracker, project_id, file, entry).await
            })
        });

        let mut outcomes = Vec::new();
        for joined in join_all(tasks).await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    error!(%project_id, join_error = ?err, "uploads: upload task aborted");
                    outcomes.push(UploadOutcome::failed("unknown", "Upload task aborted"));
                }
            }
        }

        info!(
            %user_id,
            %project_id,
            uploaded = outcomes.iter().filter(|o| o.success).count(),
            failed = outcomes.iter().filter(|o| !o.success).count(),
            "uploads: batch finished"
        );

        Ok(outcomes)
    }

    pub async fn upload_queue(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Vec<UploadEntry>, UploadError> {
        self.project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(UploadError::NotFound)?;

        Ok(self.tracker.snapshot(project_id))
    }
}

async fn upload_one<I, S>(
    image_repo: Arc<I>,
    storage: Arc<S>,
    tracker: Arc<UploadTracker>,
    project_id: Uuid,
    file: IncomingImage,
    entry: UploadEntry,
) -> UploadOutcome
where
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let entry_id = entry.id;
    let fail = |message: String| {
        tracker.set_status(
            project_id,
            entry_id,
            UploadStatus::Error {
                message: message.clone(),
            },
        );
        tracker.schedule_error_expiry(project_id, entry_id);
        UploadOutcome::failed(entry.file_name.clone(), message)
    };

    tracker.set_status(project_id, entry_id, UploadStatus::Uploading { progress: 0 });

    tracker.set_status(project_id, entry_id, UploadStatus::Uploading { progress: 50 });
    if let Err(err) = storage
        .upload_original(&entry.stored_name, file.bytes, &file.content_type)
        .await
    {
        error!(%project_id, file_name = %entry.file_name, storage_error = ?err, "uploads: storage write failed");
        let message = match err.downcast_ref::<StorageError>() {
            Some(storage_err) => storage_err.upload_message(),
            None => format!("Upload failed: {err}"),
        };
        return fail(message);
    }

    tracker.set_status(project_id, entry_id, UploadStatus::Uploading { progress: 75 });
    if let Err(err) = image_repo
        .insert_image(InsertProjectImageEntity::first_attempt(
            project_id,
            entry.stored_name.clone(),
        ))
        .await
    {
        error!(%project_id, file_name = %entry.file_name, db_error = ?err, "uploads: image row insert failed");
        return fail("Failed to create database record".to_string());
    }

    tracker.set_status(project_id, entry_id, UploadStatus::Completed);
    tracker.schedule_removal(project_id, entry_id);

    UploadOutcome::succeeded(entry.file_name.clone())
}
