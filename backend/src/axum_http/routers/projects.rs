use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{
            project_images::ProjectImageRepository, projects::ProjectRepository,
            storage::ImageStorageClient, users::UserRepository,
        },
        value_objects::projects::{CreateProjectModel, UpdateProjectFieldModel},
    },
    infra::{
        db::{
            postgres::postgres_connection::PgPoolSquad,
            repositories::{
                project_images::ProjectImagePostgres, projects::ProjectPostgres,
                users::UserPostgres,
            },
        },
        storages::supabase_storage::SupabaseStorageClient,
    },
};
use serde_json::json;

use crate::{
    auth::AuthUser,
    axum_http::{
        error_responses::{AppError, JsonBody},
        routers::project_id_from_path,
    },
    usecases::projects::ProjectUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, storage: Arc<SupabaseStorageClient>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let project_repository = ProjectPostgres::new(Arc::clone(&db_pool));
    let project_image_repository = ProjectImagePostgres::new(Arc::clone(&db_pool));
    let project_usecase = ProjectUseCase::new(
        Arc::new(user_repository),
        Arc::new(project_repository),
        Arc::new(project_image_repository),
        storage,
    );

    Router::new()
        .route("/api/profile", post(bootstrap_profile))
        .route("/api/create-project", post(create_project))
        .route("/api/projects", get(list_projects))
        .route(
            "/api/projects/:project_id",
            get(get_project).patch(update_project_field),
        )
        .route("/api/projects/:project_id/video", get(video_link))
        .with_state(Arc::new(project_usecase))
}

type ProjectState<U, P, I, S> = State<Arc<ProjectUseCase<U, P, I, S>>>;

pub async fn bootstrap_profile<U, P, I, S>(
    State(project_usecase): ProjectState<U, P, I, S>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    match project_usecase
        .bootstrap_profile(auth.user_id, auth.email)
        .await
    {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_project<U, P, I, S>(
    State(project_usecase): ProjectState<U, P, I, S>,
    auth: AuthUser,
    WithRejection(Json(create_project_model), _): JsonBody<CreateProjectModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    match project_usecase
        .create_project(auth.user_id, auth.email, create_project_model)
        .await
    {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn list_projects<U, P, I, S>(
    State(project_usecase): ProjectState<U, P, I, S>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    match project_usecase.list_projects(auth.user_id).await {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn get_project<U, P, I, S>(
    State(project_usecase): ProjectState<U, P, I, S>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match project_usecase.get_project(auth.user_id, project_id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_project_field<U, P, I, S>(
    State(project_usecase): ProjectState<U, P, I, S>,
    auth: AuthUser,
    Path(project_id): Path<String>,
    WithRejection(Json(update_model), _): JsonBody<UpdateProjectFieldModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match project_usecase
        .update_field(auth.user_id, project_id, update_model)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn video_link<U, P, I, S>(
    State(project_usecase): ProjectState<U, P, I, S>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match project_usecase.video_link(auth.user_id, project_id).await {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
