use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{
            processing_queue::ProcessingQueueRepository, project_images::ProjectImageRepository,
            projects::ProjectRepository,
        },
        value_objects::processing::TweakRequestModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            processing_queue::ProcessingQueuePostgres, project_images::ProjectImagePostgres,
            projects::ProjectPostgres,
        },
    },
};

use crate::{
    auth::AuthUser,
    axum_http::{
        error_responses::{AppError, JsonBody},
        routers::{image_id_from_path, project_id_from_path},
    },
    usecases::processing::ProcessingUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let project_repository = ProjectPostgres::new(Arc::clone(&db_pool));
    let project_image_repository = ProjectImagePostgres::new(Arc::clone(&db_pool));
    let processing_queue_repository = ProcessingQueuePostgres::new(Arc::clone(&db_pool));
    let processing_usecase = ProcessingUseCase::new(
        Arc::new(project_repository),
        Arc::new(project_image_repository),
        Arc::new(processing_queue_repository),
    );

    Router::new()
        .route("/api/projects/:project_id/generate", post(generate_all_images))
        .route(
            "/api/projects/:project_id/images/:image_id/tweak",
            post(submit_tweak),
        )
        .route("/api/projects/:project_id/video", post(generate_video))
        .with_state(Arc::new(processing_usecase))
}

pub async fn generate_all_images<P, I, Q>(
    State(processing_usecase): State<Arc<ProcessingUseCase<P, I, Q>>>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    Q: ProcessingQueueRepository + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match processing_usecase
        .generate_all_images(auth.user_id, project_id)
        .await
    {
        Ok(enqueued) => (StatusCode::ACCEPTED, Json(enqueued)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn submit_tweak<P, I, Q>(
    State(processing_usecase): State<Arc<ProcessingUseCase<P, I, Q>>>,
    auth: AuthUser,
    Path((project_id, image_id)): Path<(String, String)>,
    WithRejection(Json(tweak_model), _): JsonBody<TweakRequestModel>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    Q: ProcessingQueueRepository + Send + Sync + 'static,
{
    let ids = project_id_from_path(&project_id)
        .and_then(|project_id| Ok((project_id, image_id_from_path(&image_id)?)));
    let (project_id, image_id) = match ids {
        Ok(ids) => ids,
        Err(err) => return err.into_response(),
    };

    match processing_usecase
        .submit_tweak(auth.user_id, project_id, image_id, &tweak_model.instruction)
        .await
    {
        Ok(enqueued) => (StatusCode::ACCEPTED, Json(enqueued)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn generate_video<P, I, Q>(
    State(processing_usecase): State<Arc<ProcessingUseCase<P, I, Q>>>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    Q: ProcessingQueueRepository + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match processing_usecase.generate_video(auth.user_id, project_id).await {
        Ok(enqueued) => (StatusCode::ACCEPTED, Json(enqueued)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
