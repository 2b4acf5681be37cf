use std::sync::Arc;

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};
use axum_extra::extract::WithRejection;
use crates::{
    domain::{
        repositories::{billing_log::BillingLogRepository, projects::ProjectRepository},
        value_objects::checkout::StartPaymentModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{billing_log::BillingLogPostgres, projects::ProjectPostgres},
    },
    payments::stripe_client::StripeClient,
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::{AppError, JsonBody},
    usecases::checkout::{CheckoutUseCase, PaymentFlow, PaymentGateway},
};

pub fn routes(db_pool: Arc<PgPoolSquad>, stripe: Arc<StripeClient>, site_url: String) -> Router {
    let project_repository = ProjectPostgres::new(Arc::clone(&db_pool));
    let billing_log_repository = BillingLogPostgres::new(Arc::clone(&db_pool));
    let checkout_usecase = CheckoutUseCase::new(
        Arc::new(project_repository),
        Arc::new(billing_log_repository),
        stripe,
        site_url,
    );

    Router::new()
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/api/create-payment-intent", post(create_payment_intent))
        .with_state(Arc::new(checkout_usecase))
}

pub async fn create_checkout_session<P, B, G>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, B, G>>>,
    auth: AuthUser,
    WithRejection(Json(start_payment_model), _): JsonBody<StartPaymentModel>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    B: BillingLogRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    match checkout_usecase
        .start_payment(auth.user_id, start_payment_model, PaymentFlow::CheckoutSession)
        .await
    {
        Ok(started) => (StatusCode::OK, Json(started)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_payment_intent<P, B, G>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<P, B, G>>>,
    auth: AuthUser,
    WithRejection(Json(start_payment_model), _): JsonBody<StartPaymentModel>,
) -> impl IntoResponse
where
    P: ProjectRepository + Send + Sync + 'static,
    B: BillingLogRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    match checkout_usecase
        .start_payment(auth.user_id, start_payment_model, PaymentFlow::PaymentIntent)
        .await
    {
        Ok(started) => (StatusCode::OK, Json(started)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
