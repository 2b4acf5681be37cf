use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{
            project_images::ProjectImageRepository, projects::ProjectRepository,
            storage::ImageStorageClient,
        },
        value_objects::confirmations::DeletionTarget,
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

use crate::{
    auth::AuthUser,
    axum_http::{
        error_responses::{AppError, JsonBody},
        routers::{image_id_from_path, project_id_from_path},
    },
    usecases::confirmations::{DeletionOutcome, DeletionUseCase, DestructiveConfirmations},
};

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    storage: Arc<SupabaseStorageClient>,
    confirmations: Arc<DestructiveConfirmations>,
) -> Router {
    let project_repository = ProjectPostgres::new(Arc::clone(&db_pool));
    let project_image_repository = ProjectImagePostgres::new(Arc::clone(&db_pool));
    let deletion_usecase = DeletionUseCase::new(
        Arc::new(project_repository),
        Arc::new(project_image_repository),
        storage,
        confirmations,
    );

    Router::new()
        .route("/api/projects/:project_id", delete(delete_project))
        .route(
            "/api/projects/:project_id/images/:image_id",
            delete(delete_image),
        )
        .route("/api/confirmations/cancel", post(cancel_confirmation))
        .with_state(Arc::new(deletion_usecase))
}

fn outcome_response(outcome: DeletionOutcome) -> axum::response::Response {
    let status = match outcome {
        DeletionOutcome::ConfirmRequired { .. } => StatusCode::ACCEPTED,
        DeletionOutcome::Deleted { .. } => StatusCode::OK,
    };
    (status, Json(outcome)).into_response()
}

pub async fn delete_project<P, I, S>(
    State(deletion_usecase): State<Arc<DeletionUseCase<P, I, S>>>,
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

    match deletion_usecase.delete_project(auth.user_id, project_id).await {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn delete_image<P, I, S>(
    State(deletion_usecase): State<Arc<DeletionUseCase<P, I, S>>>,
    auth: AuthUser,
    Path((project_id, image_id)): Path<(String, String)>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let ids = project_id_from_path(&project_id)
        .and_then(|project_id| Ok((project_id, image_id_from_path(&image_id)?)));
    let (project_id, image_id) = match ids {
        Ok(ids) => ids,
        Err(err) => return err.into_response(),
    };

    match deletion_usecase
        .delete_image(auth.user_id, project_id, image_id)
        .await
    {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn cancel_confirmation<P, I, S>(
    State(deletion_usecase): State<Arc<DeletionUseCase<P, I, S>>>,
    auth: AuthUser,
    WithRejection(Json(target), _): JsonBody<DeletionTarget>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    let cancelled = deletion_usecase.cancel(auth.user_id, target);
    (StatusCode::OK, Json(json!({ "cancelled": cancelled })))
}
