use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{
            project_images::ProjectImageRepository, projects::ProjectRepository,
            storage::ImageStorageClient,
        },
        value_objects::downloads::DownloadImagesModel,
    },
    infra::{
        db::{
            postgres::postgres_connection::PgPoolSquad,
            repositories::{project_images::ProjectImagePostgres, projects::ProjectPostgres},
        },
        storages::supabase_storage::SupabaseStorageClient,
    },
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{AppError, JsonBody},
    usecases::downloads::DownloadUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, storage: Arc<SupabaseStorageClient>) -> Router {
    let project_repository = ProjectPostgres::new(Arc::clone(&db_pool));
    let project_image_repository = ProjectImagePostgres::new(Arc::clone(&db_pool));
    let download_usecase = DownloadUseCase::new(
        Arc::new(project_repository),
        Arc::new(project_image_repository),
        storage,
    );

    Router::new()
        .route("/api/download-images", post(download_images))
        .with_state(Arc::new(download_usecase))
}

pub async fn download_images<P, I, S>(
    State(download_usecase): State<Arc<DownloadUseCase<P, I, S>>>,
    auth: AuthUser,
    WithRejection(Json(download_model), _): JsonBody<DownloadImagesModel>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    match download_usecase
        .download_images(auth.user_id, download_model)
        .await
    {
        Ok(archive) => (
            StatusCode::OK,
            [
                (CONTENT_TYPE, "application/zip".to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", archive.file_name),
                ),
            ],
            archive.bytes,
        )
            .into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
