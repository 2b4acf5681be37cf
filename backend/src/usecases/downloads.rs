use std::{
    io::{Cursor, Write},
    sync::Arc,
};

use crates::domain::{
    repositories::{
        project_images::ProjectImageRepository, projects::ProjectRepository,
        storage::ImageStorageClient,
    },
    value_objects::downloads::{
        DownloadImagesModel, archive_entry_name, archive_file_name, archive_folder,
    },
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{axum_http::error_responses::AppError, usecases::projects::parse_project_id};

const DEFLATE_LEVEL: i64 = 6;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Project ID is required")]
    MissingProjectId,
    #[error("Project not found or access denied")]
    ProjectNotFound,
    #[error("No completed images found")]
    NoCompletedImages,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DownloadError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DownloadError::MissingProjectId => StatusCode::BAD_REQUEST,
            DownloadError::ProjectNotFound | DownloadError::NoCompletedImages => {
                StatusCode::NOT_FOUND
            }
            DownloadError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DownloadError> for AppError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Internal(source) => AppError::Internal(source),
            DownloadError::MissingProjectId => AppError::BadRequest(err.to_string()),
            other => AppError::NotFound(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ImageArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub entries: usize,
}

pub struct DownloadUseCase<P, I, S>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    project_repo: Arc<P>,
    image_repo: Arc<I>,
    storage: Arc<S>,
}

impl<P, I, S> DownloadUseCase<P, I, S>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    pub fn new(project_repo: Arc<P>, image_repo: Arc<I>, storage: Arc<S>) -> Self {
        Self {
            project_repo,
            image_repo,
            storage,
        }
    }

    /// Zips every completed output of the project; images that fail to download are skipped.
    pub async fn download_images(
        &self,
        user_id: Uuid,
        model: DownloadImagesModel,
    ) -> Result<ImageArchive, DownloadError> {
        if model
            .project_id
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .is_empty()
        {
            return Err(DownloadError::MissingProjectId);
        }
        let project_id =
            parse_project_id(model.project_id.as_deref()).ok_or(DownloadError::ProjectNotFound)?;

        let project = self
            .project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(DownloadError::ProjectNotFound)?;

        let images = self.image_repo.list_completed_with_output(project_id).await?;
        if images.is_empty() {
            return Err(DownloadError::NoCompletedImages);
        }

        let folder = archive_folder(&project.name);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(DEFLATE_LEVEL));
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut entries = 0;

        for (index, image) in images.iter().enumerate() {
            let Some(processed) = image.processed_url.as_deref() else {
                continue;
            };

            let bytes = match self.storage.download_processed(processed).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(%project_id, image_id = %image.id, storage_error = ?err, "downloads: skipping image that failed to download");
                    continue;
                }
            };

            zip.start_file(archive_entry_name(&folder, index + 1), options)
                .map_err(anyhow::Error::from)?;
            zip.write_all(&bytes).map_err(anyhow::Error::from)?;
            entries += 1;
        }

        let bytes = zip.finish().map_err(anyhow::Error::from)?.into_inner();

        info!(%user_id, %project_id, entries, size_bytes = bytes.len(), "downloads: archive built");
        Ok(ImageArchive {
            file_name: archive_file_name(&folder),
            bytes,
            entries,
        })
    }
}
