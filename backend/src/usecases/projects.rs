use std::{sync::Arc, time::Duration};

use crates::domain::{
    entities::{
        project_images::InsertProjectImageEntity, projects::InsertProjectEntity,
        users::InsertUserEntity,
    },
    repositories::{
        project_images::ProjectImageRepository, projects::ProjectRepository,
        storage::ImageStorageClient, users::UserRepository,
    },
    value_objects::{
        enums::{packages::Package, project_statuses::ProjectStatus},
        projects::{
            CreateProjectModel, CreatedProjectModel, FREE_TRIAL_PROJECT_NAME, ProjectDetailsModel,
            ProjectField, ProjectImageModel, ProjectModel, UpdateProjectFieldModel,
        },
        storage::{SIGNED_URL_TTL_SECS, original_key},
        uploads::UploadOutcome,
    },
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project name is required")]
    MissingName,
    #[error("Project ID is required")]
    MissingProjectId,
    #[error("At least one image is required")]
    NoImages,
    #[error("Invalid package")]
    InvalidPackage,
    #[error("Unknown project field: {0}")]
    UnknownField(String),
    #[error("This project allows at most {limit} images")]
    QuotaExceeded { limit: usize },
    #[error("Project not found or access denied")]
    NotFound,
    #[error("Video is not ready yet")]
    VideoNotReady,
    #[error("Failed to create user profile")]
    ProfileCreation,
    #[error("Failed to create project")]
    CreateFailed,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ProjectError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ProjectError::MissingName
            | ProjectError::MissingProjectId
            | ProjectError::NoImages
            | ProjectError::InvalidPackage
            | ProjectError::UnknownField(_)
            | ProjectError::QuotaExceeded { .. } => StatusCode::BAD_REQUEST,
            ProjectError::NotFound => StatusCode::NOT_FOUND,
            ProjectError::VideoNotReady => StatusCode::CONFLICT,
            ProjectError::ProfileCreation
            | ProjectError::CreateFailed
            | ProjectError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        use axum::http::StatusCode;
        match (err.status_code(), err) {
            (_, ProjectError::Internal(source)) => AppError::Internal(source),
            (StatusCode::BAD_REQUEST, err) => AppError::BadRequest(err.to_string()),
            (StatusCode::NOT_FOUND, err) => AppError::NotFound(err.to_string()),
            (StatusCode::CONFLICT, err) => AppError::Conflict(err.to_string()),
            (_, err) => AppError::Unavailable(err.to_string()),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ProjectError>;

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub success: bool,
    pub project: CreatedProjectModel,
    pub uploads: Vec<UploadOutcome>,
}

#[derive(Debug, Serialize)]
pub struct ProfileModel {
    pub user_id: Uuid,
    pub created: bool,
    pub free_trial_project_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct VideoLinkModel {
    pub video_url: String,
}

pub fn parse_project_id(raw: Option<&str>) -> Option<Uuid> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| Uuid::parse_str(value).ok())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct ProjectUseCase<U, P, I, S>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    project_repo: Arc<P>,
    image_repo: Arc<I>,
    storage: Arc<S>,
}

impl<U, P, I, S> ProjectUseCase<U, P, I, S>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProjectRepository + Send + Sync + 'static,
    I: ProjectImageRepository + Send + Sync + 'static,
    S: ImageStorageClient + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, project_repo: Arc<P>, image_repo: Arc<I>, storage: Arc<S>) -> Self {
        Self {
            user_repo,
            project_repo,
            image_repo,
            storage,
        }
    }

    /// Authenticated visit: writes the profile if missing and, while the user has
    /// not used the free trial, a starter-package trial project.
    pub async fn bootstrap_profile(
        &self,
        user_id: Uuid,
        email: Option<String>,
    ) -> UseCaseResult<ProfileModel> {
        let created = self
            .user_repo
            .ensure_profile(InsertUserEntity { id: user_id, email })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "projects: failed to write user profile");
                ProjectError::ProfileCreation
            })?;

        // The row may predate this call (create-project also writes it), so trust the flag.
        let trial_used = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "projects: failed to read user profile");
                ProjectError::ProfileCreation
            })?
            .map_or(true, |user| user.has_used_free_trial());

        if trial_used {
            return Ok(ProfileModel {
                user_id,
                created,
                free_trial_project_id: None,
            });
        }

        let trial = self
            .project_repo
            .create_project(InsertProjectEntity {
                user_id,
                name: FREE_TRIAL_PROJECT_NAME.to_string(),
                address: None,
                global_instructions: None,
                package: Package::Starter.to_string(),
                status: ProjectStatus::Draft.to_string(),
                ai_description: None,
            })
            .await;

        let free_trial_project_id = match trial {
            Ok(project) => {
                if let Err(err) = self.user_repo.mark_free_trial_used(user_id).await {
                    warn!(%user_id, db_error = ?err, "projects: failed to flag free trial as used");
                }
                info!(%user_id, project_id = %project.id, "projects: free trial project created");
                Some(project.id)
            }
            Err(err) => {
                error!(%user_id, db_error = ?err, "projects: failed to create free trial project");
                None
            }
        };

        Ok(ProfileModel {
            user_id,
            created,
            free_trial_project_id,
        })
    }

    pub async fn create_project(
        &self,
        user_id: Uuid,
        email: Option<String>,
        model: CreateProjectModel,
    ) -> UseCaseResult<CreateProjectResponse> {
        let adding_to = if model.is_adding_to_existing {
            if model.project_id.as_deref().map(str::trim).unwrap_or_default().is_empty() {
                return Err(ProjectError::MissingProjectId);
            }
            if model.pre_uploaded_images.is_empty() {
                return Err(ProjectError::NoImages);
            }
            Some(parse_project_id(model.project_id.as_deref()).ok_or(ProjectError::NotFound)?)
        } else {
            None
        };

        let name = model.project_name.as_deref().map(str::trim).unwrap_or_default();
        if adding_to.is_none() && name.is_empty() {
            return Err(ProjectError::MissingName);
        }

        let package = match model.selected_package.as_deref() {
            None | Some("") => Package::Starter,
            Some(raw) => Package::from_str(raw).ok_or(ProjectError::InvalidPackage)?,
        };

        self.user_repo
            .ensure_profile(InsertUserEntity { id: user_id, email })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "projects: failed to write user profile");
                ProjectError::ProfileCreation
            })?;

        let project = match adding_to {
            Some(project_id) => {
                info!(%user_id, %project_id, "projects: adding images to existing project");
                self.project_repo
                    .find_owned(user_id, project_id)
                    .await?
                    .ok_or(ProjectError::NotFound)?
            }
            None => self
                .project_repo
                .create_project(InsertProjectEntity {
                    user_id,
                    name: name.to_string(),
                    address: non_blank(model.address),
                    global_instructions: non_blank(model.global_instructions),
                    package: package.to_string(),
                    status: ProjectStatus::Draft.to_string(),
                    ai_description: non_blank(model.ai_description),
                })
                .await
                .map_err(|err| {
                    error!(%user_id, db_error = ?err, "projects: failed to create project");
                    ProjectError::CreateFailed
                })?,
        };

        let mut uploads = Vec::with_capacity(model.pre_uploaded_images.len());
        if !model.pre_uploaded_images.is_empty() {
            let limit = project.package().image_limit();
            let existing = self.image_repo.count_by_project(project.id).await? as usize;
            if existing + model.pre_uploaded_images.len() > limit {
                warn!(
                    %user_id,
                    project_id = %project.id,
                    existing,
                    incoming = model.pre_uploaded_images.len(),
                    limit,
                    "projects: image quota exceeded"
                );
                return Err(ProjectError::QuotaExceeded { limit });
            }

            for image in &model.pre_uploaded_images {
                let file_name = image.file_name();
                let outcome = match self
                    .image_repo
                    .insert_image(InsertProjectImageEntity::first_attempt(
                        project.id,
                        file_name.clone(),
                    ))
                    .await
                {
                    Ok(_) => UploadOutcome::succeeded(file_name),
                    Err(err) => {
                        error!(project_id = %project.id, %file_name, db_error = ?err, "projects: failed to record pre-uploaded image");
                        UploadOutcome::failed(file_name, err.to_string())
                    }
                };
                uploads.push(outcome);
            }
        }

        info!(
            %user_id,
            project_id = %project.id,
            uploads = uploads.len(),
            "projects: create project finished"
        );

        Ok(CreateProjectResponse {
            success: true,
            project: CreatedProjectModel {
                id: project.id,
                package: project.package(),
                name: project.name,
            },
            uploads,
        })
    }

    pub async fn list_projects(&self, user_id: Uuid) -> UseCaseResult<Vec<ProjectModel>> {
        let projects = self.project_repo.list_by_user(user_id).await?;
        Ok(projects.into_iter().map(ProjectModel::from).collect())
    }

    /// Project plus images without storage calls.
    pub async fn load_details(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> UseCaseResult<ProjectDetailsModel> {
        let project = self
            .project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(ProjectError::NotFound)?;
        let images = self.image_repo.list_by_project(project_id).await?;

        Ok(ProjectDetailsModel {
            project: project.into(),
            images: images.into_iter().map(ProjectImageModel::from).collect(),
        })
    }

    pub async fn get_project(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> UseCaseResult<ProjectDetailsModel> {
        let mut details = self.load_details(user_id, project_id).await?;
        let ttl = Duration::from_secs(SIGNED_URL_TTL_SECS);

        for image in details.images.iter_mut() {
            let key = original_key(&image.original_filename);
            match self.storage.signed_url(&key, ttl).await {
                Ok(url) => image.display_url = Some(url),
                Err(err) => {
                    warn!(%project_id, image_id = %image.id, storage_error = ?err, "projects: failed to sign display url");
                }
            }
        }

        Ok(details)
    }

    pub async fn update_field(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        model: UpdateProjectFieldModel,
    ) -> UseCaseResult<()> {
        let field = ProjectField::from_str(&model.field)
            .ok_or_else(|| ProjectError::UnknownField(model.field.clone()))?;

        let value = non_blank(model.value).map(|v| v.trim().to_string());
        if field.is_required() && value.is_none() {
            return Err(ProjectError::MissingName);
        }

        let updated = self
            .project_repo
            .update_field(user_id, project_id, field, value)
            .await?;

        if !updated {
            return Err(ProjectError::NotFound);
        }

        info!(%user_id, %project_id, field = ?field, "projects: field updated");
        Ok(())
    }

    pub async fn video_link(&self, user_id: Uuid, project_id: Uuid) -> UseCaseResult<VideoLinkModel> {
        let project = self
            .project_repo
            .find_owned(user_id, project_id)
            .await?
            .ok_or(ProjectError::NotFound)?;

        let video_url = match (project.status(), project.video_url) {
            (ProjectStatus::Completed, Some(url)) if !url.trim().is_empty() => url,
            _ => return Err(ProjectError::VideoNotReady),
        };

        if video_url.starts_with("http://") || video_url.starts_with("https://") {
            return Ok(VideoLinkModel { video_url });
        }

        let signed = self
            .storage
            .signed_url(&video_url, Duration::from_secs(SIGNED_URL_TTL_SECS))
            .await?;

        Ok(VideoLinkModel { video_url: signed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::test_fixtures::{sample_image, sample_project, sample_user};
    use crates::domain::{
        repositories::{
            project_images::MockProjectImageRepository, projects::MockProjectRepository,
            storage::MockImageStorageClient, users::MockUserRepository,
        },
        value_objects::projects::PreUploadedImage,
    };
    use mockall::predicate::eq;

    type TestUseCase = ProjectUseCase<
        MockUserRepository,
        MockProjectRepository,
        MockProjectImageRepository,
        MockImageStorageClient,
    >;

    fn usecase(
        users: MockUserRepository,
        projects: MockProjectRepository,
        images: MockProjectImageRepository,
        storage: MockImageStorageClient,
    ) -> TestUseCase {
        ProjectUseCase::new(
            Arc::new(users),
            Arc::new(projects),
            Arc::new(images),
            Arc::new(storage),
        )
    }

    #[tokio::test]
    async fn new_user_gets_free_trial_project() {
        let user_id = Uuid::new_v4();
        let trial = sample_project(user_id, Package::Starter, ProjectStatus::Draft);
        let trial_id = trial.id;

        let mut users = MockUserRepository::new();
        users
            .expect_ensure_profile()
            .returning(|_| Box::pin(async { Ok(true) }));
        users
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(|id| Box::pin(async move { Ok(Some(sample_user(id, false))) }));
        users
            .expect_mark_free_trial_used()
            .with(eq(user_id))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let mut projects = MockProjectRepository::new();
        projects
            .expect_create_project()
            .withf(|insert| {
                insert.name == FREE_TRIAL_PROJECT_NAME
                    && insert.package == "starter"
                    && insert.status == "draft"
            })
            .returning(move |_| {
                let trial = trial.clone();
                Box::pin(async move { Ok(trial) })
            });

        let profile = usecase(
            users,
            projects,
            MockProjectImageRepository::new(),
            MockImageStorageClient::new(),
        )
        .bootstrap_profile(user_id, Some("agent@example.com".into()))
        .await
        .unwrap();

        assert!(profile.created);
        assert_eq!(profile.free_trial_project_id, Some(trial_id));
    }

    #[tokio::test]
    async fn existing_profile_with_unused_trial_still_gets_one() {
        let user_id = Uuid::new_v4();
        let trial = sample_project(user_id, Package::Starter, ProjectStatus::Draft);
        let trial_id = trial.id;

        let mut users = MockUserRepository::new();
        users
            .expect_ensure_profile()
            .returning(|_| Box::pin(async { Ok(false) }));
        users
            .expect_find_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(sample_user(id, false))) }));
        users
            .expect_mark_free_trial_used()
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));
        let mut projects = MockProjectRepository::new();
        projects.expect_create_project().times(1).returning(move |_| {
            let trial = trial.clone();
            Box::pin(async move { Ok(trial) })
        });

        let profile = usecase(
            users,
            projects,
            MockProjectImageRepository::new(),
            MockImageStorageClient::new(),
        )
        .bootstrap_profile(user_id, None)
        .await
        .unwrap();

        assert!(!profile.created);
        assert_eq!(profile.free_trial_project_id, Some(trial_id));
    }

    #[tokio::test]
    async fn returning_user_gets_no_second_trial() {
        let mut users = MockUserRepository::new();
        users
            .expect_ensure_profile()
            .returning(|_| Box::pin(async { Ok(false) }));
        users
            .expect_find_by_id()
            .returning(|id| Box::pin(async move { Ok(Some(sample_user(id, true))) }));
        users.expect_mark_free_trial_used().never();
        let mut projects = MockProjectRepository::new();
        projects.expect_create_project().never();

        let profile = usecase(
            users,
            projects,
            MockProjectImageRepository::new(),
            MockImageStorageClient::new(),
        )
        .bootstrap_profile(Uuid::new_v4(), None)
        .await
        .unwrap();

        assert!(!profile.created);
        assert_eq!(profile.free_trial_project_id, None);
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let result = usecase(
            MockUserRepository::new(),
            MockProjectRepository::new(),
            MockProjectImageRepository::new(),
            MockImageStorageClient::new(),
        )
        .create_project(
            Uuid::new_v4(),
            None,
            CreateProjectModel {
                project_name: Some("   ".into()),
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(ProjectError::MissingName)));
    }

    #[tokio::test]
    async fn adding_to_existing_requires_images() {
        let result = usecase(
            MockUserRepository::new(),
            MockProjectRepository::new(),
            MockProjectImageRepository::new(),
            MockImageStorageClient::new(),
        )
        .create_project(
            Uuid::new_v4(),
            None,
            CreateProjectModel {
                project_id: Some(Uuid::new_v4().to_string()),
                is_adding_to_existing: true,
                ..Default::default()
            },
        )
        .await;

        assert!(matches!(result, Err(ProjectError::NoImages)));
    }

    #[tokio::test]
    async fn pre_uploaded_images_are_recorded_per_item() {
        let user_id = Uuid::new_v4();
        let project = sample_project(user_id, Package::Pro, ProjectStatus::Draft);
        let project_id = project.id;

        let mut users = MockUserRepository::new();
        users
            .expect_ensure_profile()
            .returning(|_| Box::pin(async { Ok(false) }));

        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_owned()
            .with(eq(user_id), eq(project_id))
            .returning(move |_, _| {
                let project = project.clone();
                Box::pin(async move { Ok(Some(project)) })
            });

        let mut images = MockProjectImageRepository::new();
        images
            .expect_count_by_project()
            .returning(|_| Box::pin(async { Ok(2) }));
        images
            .expect_insert_image()
            .withf(|insert| insert.attempt_number == 1 && insert.tweak_history == vec![String::new()])
            .returning(move |insert| {
                let result = if insert.original_filename == "broken.jpg" {
                    Err(anyhow::anyhow!("duplicate key"))
                } else {
                    Ok(sample_image(insert.project_id, 1))
                };
                Box::pin(async move { result })
            });

        let response = usecase(users, projects, images, MockImageStorageClient::new())
            .create_project(
                user_id,
                None,
                CreateProjectModel {
                    project_id: Some(project_id.to_string()),
                    is_adding_to_existing: true,
                    pre_uploaded_images: vec![
                        PreUploadedImage {
                            url: "https://cdn.test/original/Villa_Rosa_03.jpg".into(),
                            filename: None,
                        },
                        PreUploadedImage {
                            url: String::new(),
                            filename: Some("broken.jpg".into()),
                        },
                    ],
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(response.project.id, project_id);
        assert_eq!(response.uploads.len(), 2);
        assert!(response.uploads[0].success);
        assert_eq!(response.uploads[0].file_name, "Villa_Rosa_03.jpg");
        assert!(!response.uploads[1].success);
    }

    #[tokio::test]
    async fn pre_uploaded_images_respect_quota() {
        let user_id = Uuid::new_v4();
        let project = sample_project(user_id, Package::Starter, ProjectStatus::Draft);
        let project_id = project.id;

        let mut users = MockUserRepository::new();
        users
            .expect_ensure_profile()
            .returning(|_| Box::pin(async { Ok(false) }));
        let mut projects = MockProjectRepository::new();
        projects.expect_find_owned().returning(move |_, _| {
            let project = project.clone();
            Box::pin(async move { Ok(Some(project)) })
        });
        let mut images = MockProjectImageRepository::new();
        images
            .expect_count_by_project()
            .returning(|_| Box::pin(async { Ok(5) }));
        images.expect_insert_image().never();

        let result = usecase(users, projects, images, MockImageStorageClient::new())
            .create_project(
                user_id,
                None,
                CreateProjectModel {
                    project_id: Some(project_id.to_string()),
                    is_adding_to_existing: true,
                    pre_uploaded_images: vec![PreUploadedImage::default(); 2],
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ProjectError::QuotaExceeded { limit: 6 })));
    }

    #[tokio::test]
    async fn get_project_signs_original_urls() {
        let user_id = Uuid::new_v4();
        let project = sample_project(user_id, Package::Pro, ProjectStatus::Paid);
        let project_id = project.id;
        let image = sample_image(project_id, 1);
        let expected_key = format!("original/{}", image.original_filename);

        let mut projects = MockProjectRepository::new();
        projects.expect_find_owned().returning(move |_, _| {
            let project = project.clone();
            Box::pin(async move { Ok(Some(project)) })
        });
        let mut images = MockProjectImageRepository::new();
        images.expect_list_by_project().returning(move |_| {
            let image = image.clone();
            Box::pin(async move { Ok(vec![image]) })
        });
        let mut storage = MockImageStorageClient::new();
        storage
            .expect_signed_url()
            .withf(move |key, ttl| key == expected_key && *ttl == Duration::from_secs(3600))
            .returning(|key, _| {
                let url = format!("https://signed.test/{key}");
                Box::pin(async move { Ok(url) })
            });

        let details = usecase(MockUserRepository::new(), projects, images, storage)
            .get_project(user_id, project_id)
            .await
            .unwrap();

        assert!(
            details.images[0]
                .display_url
                .as_deref()
                .unwrap()
                .starts_with("https://signed.test/original/")
        );
    }

    #[tokio::test]
    async fn video_link_requires_completed_project() {
        let user_id = Uuid::new_v4();
        let mut project = sample_project(user_id, Package::Pro, ProjectStatus::Filming);
        project.video_url = Some("videos/villa.mp4".into());

        let mut projects = MockProjectRepository::new();
        projects.expect_find_owned().returning(move |_, _| {
            let project = project.clone();
            Box::pin(async move { Ok(Some(project)) })
        });

        let result = usecase(
            MockUserRepository::new(),
            projects,
            MockProjectImageRepository::new(),
            MockImageStorageClient::new(),
        )
        .video_link(user_id, Uuid::new_v4())
        .await;

        assert!(matches!(result, Err(ProjectError::VideoNotReady)));
    }

    #[tokio::test]
    async fn update_field_rejects_unknown_columns() {
        let mut projects = MockProjectRepository::new();
        projects.expect_update_field().never();

        let result = usecase(
            MockUserRepository::new(),
            projects,
            MockProjectImageRepository::new(),
            MockImageStorageClient::new(),
        )
        .update_field(
            Uuid::new_v4(),
            Uuid::new_v4(),
            UpdateProjectFieldModel {
                field: "status".into(),
                value: Some("paid".into()),
            },
        )
        .await;

        assert!(matches!(result, Err(ProjectError::UnknownField(_))));
    }
}
