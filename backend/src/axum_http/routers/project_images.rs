use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            project_images::ProjectImageRepository, projects::ProjectRepository,
            storage::ImageStorageClient,
        },
        value_objects::uploads::{IncomingImage, MAX_UPLOAD_BYTES},
    },
    infra::{
        db::{
            postgres::postgres_connection::PgPoolSquad,
            repositories::{project_images::ProjectImagePostgres, projects::ProjectPostgres},
        },
        storages::supabase_storage::SupabaseStorageClient,
    },
};
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::debug;

use crate::{
    auth::AuthUser,
    axum_http::{error_responses::AppError, routers::project_id_from_path},
    usecases::uploads::{UploadTracker, UploadUseCase},
};

/// Largest package quota; the per-file cap is checked after the body is read.
const MAX_FILES_PER_BATCH: usize = 30;
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    storage: Arc<SupabaseStorageClient>,
    tracker: Arc<UploadTracker>,
) -> Router {
    let project_repository = ProjectPostgres::new(Arc::clone(&db_pool));
    let project_image_repository = ProjectImagePostgres::new(Arc::clone(&db_pool));
    let upload_usecase = UploadUseCase::new(
        Arc::new(project_repository),
        Arc::new(project_image_repository),
        storage,
        tracker,
    );

    Router::new()
        .route("/api/projects/:project_id/images", post(upload_images))
        .route("/api/projects/:project_id/uploads", get(upload_queue))
        .with_state(Arc::new(upload_usecase))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            MAX_UPLOAD_BYTES * MAX_FILES_PER_BATCH + MULTIPART_OVERHEAD_BYTES,
        ))
}

async fn read_files(mut multipart: Multipart) -> Result<Vec<IncomingImage>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Invalid multipart body: {err}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!(field = ?field.name(), "uploads: skipping non-file field");
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("Failed to read {file_name}: {err}")))?;

        files.push(IncomingImage::new(file_name, content_type, bytes));
    }
    Ok(files)
}

pub async fn upload_images<P, I, S>(
    State(upload_usecase): State<Arc<UploadUseCase<P, I, S>>>,
    auth: AuthUser,
    Path(project_id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    let files = match read_files(multipart).await {
        Ok(files) => files,
        Err(err) => return err.into_response(),
    };

    match upload_usecase
        .upload_images(auth.user_id, project_id, files)
        .await
    {
        Ok(uploads) => (
            StatusCode::OK,
            Json(json!({ "success": true, "uploads": uploads })),
        )
            .into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn upload_queue<P, I, S>(
    State(upload_usecase): State<Arc<UploadUseCase<P, I, S>>>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match upload_usecase.upload_queue(auth.user_id, project_id).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
