use std::sync::Arc;

use async_trait::async_trait;
use crates::{
    ai::gemini_client::GeminiClient,
    domain::value_objects::descriptions::GenerateDescriptionModel,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[async_trait]
impl DescriptionGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.generate_text(prompt).await
    }
}

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("Project name is required")]
    MissingProjectName,
    #[error("Failed to generate description")]
    Upstream(#[source] anyhow::Error),
}

impl DescriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DescriptionError::MissingProjectName => StatusCode::BAD_REQUEST,
            DescriptionError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DescriptionError> for AppError {
    fn from(err: DescriptionError) -> Self {
        match err {
            DescriptionError::MissingProjectName => AppError::BadRequest(err.to_string()),
            DescriptionError::Upstream(_) => AppError::Unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GeneratedDescription {
    pub success: bool,
    pub description: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Listing-copy prompt. The length target is a request to the model, not a check.
pub fn build_prompt(model: &GenerateDescriptionModel, project_name: &str) -> String {
    let address = present(&model.address);
    let instructions = present(&model.global_instructions);
    let image_count = match model.image_count {
        Some(count) if count > 0 => count.to_string(),
        _ => "multiple".to_string(),
    };

    let located = address
        .map(|a| format!(" located at {a}"))
        .unwrap_or_default();
    let address_line = address
        .map(|a| format!("- Address: {a}"))
        .unwrap_or_default();
    let style_line = instructions
        .map(|i| format!("- Style preferences: {i}"))
        .unwrap_or_default();

    format!(
        "Generate a compelling real estate listing description for a property called \"{project_name}\"{located}.

Key details:
- Property name: {project_name}
{address_line}
{style_line}
- Number of images: {image_count}

Please write a professional, engaging real estate listing description (1500-2000 characters) that would appeal to potential buyers or renters. Focus on the property's appeal, lifestyle benefits, and key selling points. Make it suitable for platforms like Rightmove, Zoopla, or similar real estate listing sites.

The description should be written in a natural, professional tone that real estate agents would use."
    )
}

pub struct DescriptionUseCase<G>
where
    G: DescriptionGenerator + 'static,
{
    generator: Arc<G>,
}

impl<G> DescriptionUseCase<G>
where
    G: DescriptionGenerator + 'static,
{
    pub fn new(generator: Arc<G>) -> Self {
        Self { generator }
    }

    pub async fn generate_description(
        &self,
        user_id: Uuid,
        model: GenerateDescriptionModel,
    ) -> Result<GeneratedDescription, DescriptionError> {
        let project_name = present(&model.project_name)
            .ok_or(DescriptionError::MissingProjectName)?
            .to_string();

        let prompt = build_prompt(&model, &project_name);
        let description = self.generator.generate(&prompt).await.map_err(|err| {
            error!(%user_id, upstream_error = ?err, "descriptions: generation failed");
            DescriptionError::Upstream(err)
        })?;

        let description = description.trim().to_string();
        info!(%user_id, chars = description.chars().count(), "descriptions: description generated");

        Ok(GeneratedDescription {
            success: true,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: Option<&str>) -> GenerateDescriptionModel {
        GenerateDescriptionModel {
            project_name: name.map(str::to_string),
            address: Some("12 Quay Street, Bristol".into()),
            global_instructions: None,
            image_count: Some(14),
        }
    }

    #[test]
    fn prompt_mentions_only_the_details_given() {
        let prompt = build_prompt(&model(Some("Harbour Loft")), "Harbour Loft");

        assert!(prompt.contains("called \"Harbour Loft\" located at 12 Quay Street, Bristol."));
        assert!(prompt.contains("- Address: 12 Quay Street, Bristol"));
        assert!(prompt.contains("- Number of images: 14"));
        assert!(!prompt.contains("Style preferences"));
    }

    #[test]
    fn missing_image_count_reads_as_multiple() {
        let mut m = model(Some("Loft"));
        m.image_count = None;
        assert!(build_prompt(&m, "Loft").contains("- Number of images: multiple"));
    }

    #[tokio::test]
    async fn missing_name_never_calls_the_model() {
        let mut generator = MockDescriptionGenerator::new();
        generator.expect_generate().never();

        let err = DescriptionUseCase::new(Arc::new(generator))
            .generate_description(Uuid::new_v4(), model(Some("  ")))
            .await
            .unwrap_err();

        assert!(matches!(err, DescriptionError::MissingProjectName));
    }

    #[tokio::test]
    async fn description_is_trimmed() {
        let mut generator = MockDescriptionGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt| prompt.contains("Harbour Loft"))
            .returning(|_| Ok("\n  Bright harbour-side loft.  \n".to_string()));

        let generated = DescriptionUseCase::new(Arc::new(generator))
            .generate_description(Uuid::new_v4(), model(Some("Harbour Loft")))
            .await
            .unwrap();

        assert_eq!(generated.description, "Bright harbour-side loft.");
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_fixed_message() {
        let mut generator = MockDescriptionGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(anyhow::anyhow!("quota exhausted")));

        let err = DescriptionUseCase::new(Arc::new(generator))
            .generate_description(Uuid::new_v4(), model(Some("Loft")))
            .await
            .unwrap_err();

        let app: AppError = err.into();
        assert_eq!(app.to_string(), "Failed to generate description");
        assert_eq!(app.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
