pub mod checkout;
pub mod deletions;
pub mod descriptions;
pub mod downloads;
pub mod processing;
pub mod project_events;
pub mod project_images;
pub mod projects;

use uuid::Uuid;

use crate::{axum_http::error_responses::AppError, usecases::projects::parse_project_id};

/// Path ids that do not parse can never match an owned row, so they read as missing.
pub fn project_id_from_path(raw: &str) -> Result<Uuid, AppError> {
    parse_project_id(Some(raw))
        .ok_or_else(|| AppError::NotFound("Project not found or access denied".to_string()))
}

pub fn image_id_from_path(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound("Image not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn malformed_ids_are_not_found() {
        let err = project_id_from_path("not-a-uuid").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let id = Uuid::new_v4();
        assert_eq!(project_id_from_path(&id.to_string()).unwrap(), id);
        assert!(image_id_from_path("42").is_err());
    }
}
