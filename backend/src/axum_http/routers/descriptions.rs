use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use axum_extra::extract::WithRejection;
use crates::{
    ai::gemini_client::GeminiClient,
    domain::value_objects::descriptions::GenerateDescriptionModel,
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{AppError, JsonBody},
    usecases::descriptions::{DescriptionGenerator, DescriptionUseCase},
};

pub fn routes(gemini: Arc<GeminiClient>) -> Router {
    let description_usecase = DescriptionUseCase::new(gemini);

    Router::new()
        .route("/api/generate-description", post(generate_description))
        .with_state(Arc::new(description_usecase))
}

pub async fn generate_description<G>(
    State(description_usecase): State<Arc<DescriptionUseCase<G>>>,
    auth: AuthUser,
    WithRejection(Json(description_model), _): JsonBody<GenerateDescriptionModel>,
) -> impl IntoResponse
where
    G: DescriptionGenerator + 'static,
{
    match description_usecase
        .generate_description(auth.user_id, description_model)
        .await
    {
        Ok(generated) => (StatusCode::OK, Json(generated)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
