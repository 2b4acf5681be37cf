use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use crates::{
    domain::{
        entities::billing_log::InsertBillingLogEntity,
        repositories::{billing_log::BillingLogRepository, projects::ProjectRepository},
        value_objects::{
            checkout::{CheckoutSessionCreated, PaymentIntentCreated, StartPaymentModel},
            enums::{
                billing_statuses::BillingStatus, packages::Package,
                project_statuses::ProjectStatus, transaction_types::TransactionType,
            },
        },
    },
    payments::stripe_client::{OneTimePayment, StripeClient},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

pub const PAYMENT_CURRENCY: &str = "eur";

/// Reference returned by the payment processor for a created payment.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPayment {
    pub reference_id: String,
    /// Checkout URL or PaymentIntent client secret.
    pub handle: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        payment: &OneTimePayment,
        success_url: &str,
        cancel_url: &str,
    ) -> anyhow::Result<CreatedPayment>;

    async fn create_payment_intent(&self, payment: &OneTimePayment)
    -> anyhow::Result<CreatedPayment>;
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(
        &self,
        payment: &OneTimePayment,
        success_url: &str,
        cancel_url: &str,
    ) -> anyhow::Result<CreatedPayment> {
        let session =
            StripeClient::create_checkout_session(self, payment, success_url, cancel_url).await?;
        let url = session
            .url
            .ok_or_else(|| anyhow::anyhow!("checkout session {} has no url", session.id))?;

        Ok(CreatedPayment {
            reference_id: session.id,
            handle: url,
        })
    }

    async fn create_payment_intent(
        &self,
        payment: &OneTimePayment,
    ) -> anyhow::Result<CreatedPayment> {
        let intent = StripeClient::create_payment_intent(self, payment).await?;
        let client_secret = intent
            .client_secret
            .ok_or_else(|| anyhow::anyhow!("payment intent {} has no client secret", intent.id))?;

        Ok(CreatedPayment {
            reference_id: intent.id,
            handle: client_secret,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFlow {
    CheckoutSession,
    PaymentIntent,
}

impl PaymentFlow {
    fn transaction_type(&self) -> TransactionType {
        match self {
            PaymentFlow::CheckoutSession => TransactionType::CheckoutSession,
            PaymentFlow::PaymentIntent => TransactionType::PaymentIntent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaymentStarted {
    Checkout(CheckoutSessionCreated),
    Intent(PaymentIntentCreated),
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Missing projectId or package")]
    MissingFields,
    #[error("Project not found or not accessible")]
    ProjectNotFound,
    #[error("Invalid package")]
    InvalidPackage,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CheckoutError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CheckoutError::MissingFields | CheckoutError::InvalidPackage => {
                StatusCode::BAD_REQUEST
            }
            CheckoutError::ProjectNotFound => StatusCode::NOT_FOUND,
            CheckoutError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Internal(source) => AppError::Internal(source),
            CheckoutError::ProjectNotFound => AppError::NotFound(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

pub struct CheckoutUseCase<P, B, G>
where
    P: ProjectRepository + Send + Sync + 'static,
    B: BillingLogRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    project_repo: Arc<P>,
    billing_repo: Arc<B>,
    gateway: Arc<G>,
    site_url: String,
}

impl<P, B, G> CheckoutUseCase<P, B, G>
where
    P: ProjectRepository + Send + Sync + 'static,
    B: BillingLogRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    pub fn new(project_repo: Arc<P>, billing_repo: Arc<B>, gateway: Arc<G>, site_url: String) -> Self {
        Self {
            project_repo,
            billing_repo,
            gateway,
            site_url,
        }
    }

    pub async fn start_payment(
        &self,
        user_id: Uuid,
        model: StartPaymentModel,
        flow: PaymentFlow,
    ) -> Result<PaymentStarted, CheckoutError> {
        let (raw_project_id, raw_package) = match (
            model.project_id.as_deref().map(str::trim),
            model.package.as_deref().map(str::trim),
        ) {
            (Some(project_id), Some(package)) if !project_id.is_empty() && !package.is_empty() => {
                (project_id, package)
            }
            _ => return Err(CheckoutError::MissingFields),
        };

        let project_id =
            Uuid::parse_str(raw_project_id).map_err(|_| CheckoutError::ProjectNotFound)?;
        let project = self
            .project_repo
            .find_owned_draft(user_id, project_id)
            .await?
            .ok_or_else(|| {
                warn!(%user_id, %project_id, "checkout: project missing, foreign or not a draft");
                CheckoutError::ProjectNotFound
            })?;

        let package = Package::from_str(raw_package).ok_or(CheckoutError::InvalidPackage)?;
        let amount_minor = package.price_minor().ok_or(CheckoutError::InvalidPackage)?;

        let payment = OneTimePayment {
            amount_minor,
            currency: PAYMENT_CURRENCY.to_string(),
            product_name: format!("{} Package - {}", package.display_name(), project.name),
            product_description: format!("AI image processing for {package} package"),
            metadata: BTreeMap::from([
                ("projectId".to_string(), project_id.to_string()),
                ("userId".to_string(), user_id.to_string()),
                ("package".to_string(), package.to_string()),
            ]),
        };

        let created = match flow {
            PaymentFlow::CheckoutSession => {
                let success_url = format!(
                    "{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}",
                    self.site_url
                );
                let cancel_url = format!("{}/payment/{}", self.site_url, project_id);
                self.gateway
                    .create_checkout_session(&payment, &success_url, &cancel_url)
                    .await
            }
            PaymentFlow::PaymentIntent => self.gateway.create_payment_intent(&payment).await,
        }
        .map_err(|err| {
            error!(%user_id, %project_id, ?flow, stripe_error = ?err, "checkout: payment creation failed");
            CheckoutError::Internal(err)
        })?;

        // Marked paid before the processor confirms; no webhook reconciles this yet.
        match self
            .project_repo
            .update_status(user_id, project_id, ProjectStatus::Paid)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(%user_id, %project_id, "checkout: project vanished before it could be marked paid")
            }
            Err(err) => {
                error!(%user_id, %project_id, db_error = ?err, "checkout: failed to mark project paid")
            }
        }

        let transaction_type = flow.transaction_type();
        let billing_row = InsertBillingLogEntity {
            user_id: Some(user_id),
            project_id: Some(project_id),
            amount: amount_minor as i32,
            currency: Some(PAYMENT_CURRENCY.to_string()),
            stripe_payment_intent_id: Some(created.reference_id.clone()),
            package_type: package.to_string(),
            transaction_type: transaction_type.to_string(),
            status: Some(BillingStatus::Pending.to_string()),
            metadata: Some(json!({
                "projectName": project.name,
                "transactionType": transaction_type.as_str(),
            })),
        };
        if let Err(err) = self.billing_repo.append(billing_row).await {
            error!(%user_id, %project_id, db_error = ?err, "checkout: failed to append billing log");
        }

        info!(
            %user_id,
            %project_id,
            %package,
            reference_id = %created.reference_id,
            ?flow,
            "checkout: payment started"
        );

        Ok(match flow {
            PaymentFlow::CheckoutSession => PaymentStarted::Checkout(CheckoutSessionCreated {
                url: created.handle,
            }),
            PaymentFlow::PaymentIntent => PaymentStarted::Intent(PaymentIntentCreated {
                client_secret: created.handle,
            }),
        })
    }
}
