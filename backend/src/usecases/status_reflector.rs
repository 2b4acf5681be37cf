use std::{sync::Arc, time::Duration};

use crates::domain::{
    repositories::{project_images::ProjectImageRepository, projects::ProjectRepository},
    value_objects::{
        projects::{ProjectImageModel, ProjectModel},
        realtime::ProjectView,
    },
};
use futures_util::{Stream, stream};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Error)]
pub enum ReflectorError {
    #[error("Project not found or access denied")]
    ProjectNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ReflectorError> for AppError {
    fn from(err: ReflectorError) -> Self {
        match err {
            ReflectorError::ProjectNotFound => AppError::NotFound(err.to_string()),
            ReflectorError::Internal(source) => AppError::Internal(source),
        }
    }
}

/// Keeps a `ProjectView` in step with the store by polling and merging row patches.
pub struct StatusReflector<P, I>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
{
    project_repo: Arc<P>,
    image_repo: Arc<I>,
    poll_interval: Duration,
}

impl<P, I> StatusReflector<P, I>
where
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
{
    pub fn new(project_repo: Arc<P>, image_repo: Arc<I>, poll_interval: Duration) -> Self {
        Self {
            project_repo,
            image_repo,
            poll_interval,
        }
    }

    pub async fn snapshot(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<ProjectView, ReflectorError> {
        let project = self
            .project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(ReflectorError::ProjectNotFound)?;
        let images = self.image_repo.list_by_project(project_id).await?;

        Ok(ProjectView {
            project: ProjectModel::from(project),
            images: images.into_iter().map(ProjectImageModel::from).collect(),
        })
    }

    /// Returns true when `view` changed.
    pub async fn refresh(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        view: &mut ProjectView,
    ) -> Result<bool, ReflectorError> {
        let fresh = self.snapshot(user_id, project_id).await?;
        let changes = view.diff(&fresh);
        if changes.is_empty() {
            return Ok(false);
        }

        if changes.membership_changed {
            // Row inserts and deletes are not patches; take the fresh rows wholesale.
            debug!(%project_id, "reflector: image set changed, replacing view");
            *view = fresh;
            return Ok(true);
        }

        if let Some(patch) = changes.project {
            view.apply_project_patch(patch);
        }
        for patch in changes.images {
            view.apply_image_patch(patch);
        }
        Ok(true)
    }

    /// Emits the initial view, then every changed view, until the project disappears.
    pub fn watch(
        self: Arc<Self>,
        user_id: Uuid,
        project_id: Uuid,
        initial: ProjectView,
    ) -> impl Stream<Item = ProjectView> + Send + 'static {
        info!(%user_id, %project_id, interval_ms = self.poll_interval.as_millis() as u64, "reflector: watching project");

        stream::unfold(
            (self, initial, true),
            move |(reflector, mut view, first)| async move {
                if first {
                    let emitted = view.clone();
                    return Some((emitted, (reflector, view, false)));
                }

                loop {
                    tokio::time::sleep(reflector.poll_interval).await;
                    match reflector.refresh(user_id, project_id, &mut view).await {
                        Ok(true) => {
                            let emitted = view.clone();
                            return Some((emitted, (reflector, view, false)));
                        }
                        Ok(false) => continue,
                        Err(ReflectorError::ProjectNotFound) => {
                            info!(%user_id, %project_id, "reflector: project gone, closing stream");
                            return None;
                        }
                        Err(ReflectorError::Internal(err)) => {
                            warn!(%user_id, %project_id, db_error = ?err, "reflector: poll failed, retrying");
                        }
                    }
                }
            },
        )
    }
}
