use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{Path, State},
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use crates::{
    domain::repositories::{project_images::ProjectImageRepository, projects::ProjectRepository},
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{project_images::ProjectImagePostgres, projects::ProjectPostgres},
    },
};
use futures_util::StreamExt;
use tracing::warn;

use crate::{
    auth::AuthUser,
    axum_http::{error_responses::AppError, routers::project_id_from_path},
    usecases::status_reflector::StatusReflector,
};

pub const PROJECT_EVENT: &str = "project";

pub fn routes(db_pool: Arc<PgPoolSquad>, poll_interval: Duration) -> Router {
    let project_repository = ProjectPostgres::new(Arc::clone(&db_pool));
    let project_image_repository = ProjectImagePostgres::new(Arc::clone(&db_pool));
    let reflector = StatusReflector::new(
        Arc::new(project_repository),
        Arc::new(project_image_repository),
        poll_interval,
    );

    Router::new()
        .route("/api/projects/:project_id/events", get(project_events))
        .with_state(Arc::new(reflector))
}

pub async fn project_events<P, I>(
    State(reflector): State<Arc<StatusReflector<P, I>>>,
    auth: AuthUser,
    Path(project_id): Path<String>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
{
    let project_id = match project_id_from_path(&project_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    // The first snapshot doubles as the ownership check.
    let initial = match reflector.snapshot(auth.user_id, project_id).await {
        Ok(view) => view,
        Err(err) => return AppError::from(err).into_response(),
    };

    let events = reflector
        .watch(auth.user_id, project_id, initial)
        .filter_map(move |view| async move {
            match Event::default().event(PROJECT_EVENT).json_data(&view) {
                Ok(event) => Some(Ok::<_, Infallible>(event)),
                Err(err) => {
                    warn!(%project_id, error = ?err, "events: failed to encode project view");
                    None
                }
            }
        });

    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}
