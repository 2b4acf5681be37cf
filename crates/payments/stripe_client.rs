use std::collections::BTreeMap;

use anyhow::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{error, info};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Minimal Stripe client built on reqwest.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

/// One-off card payment for a single line item.
#[derive(Debug, Clone, PartialEq)]
pub struct OneTimePayment {
    pub amount_minor: i64,
    pub currency: String,
    pub product_name: String,
    pub product_description: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
    param: Option<String>,
    decline_code: Option<String>,
}

fn push_metadata(body: &mut Vec<(String, String)>, metadata: &BTreeMap<String, String>) {
    for (key, value) in metadata {
        body.push((format!("metadata[{}]", key), value.clone()));
    }
}

/// Form body for `POST /v1/checkout/sessions` with inline `price_data`.
pub fn checkout_session_form(
    payment: &OneTimePayment,
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    // Stripe Checkout docs:
    // https://stripe.com/docs/api/checkout/sessions/create
    let mut body: Vec<(String, String)> = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            payment.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            payment.product_name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".to_string(),
            payment.product_description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            payment.amount_minor.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
    ];

    push_metadata(&mut body, &payment.metadata);
    body
}

/// Form body for `POST /v1/payment_intents`.
pub fn payment_intent_form(payment: &OneTimePayment) -> Vec<(String, String)> {
    let mut body: Vec<(String, String)> = vec![
        ("amount".to_string(), payment.amount_minor.to_string()),
        ("currency".to_string(), payment.currency.clone()),
        ("description".to_string(), payment.product_description.clone()),
    ];

    push_metadata(&mut body, &payment.metadata);
    body
}

impl StripeClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            api_base: STRIPE_API_BASE.to_string(),
        }
    }

    async fn ensure_success(resp: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .or_else(|| resp.headers().get("stripe-request-id"))
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let details = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error);

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?details.as_ref().and_then(|d| d.type_.as_deref()),
            stripe_error_code = ?details.as_ref().and_then(|d| d.code.as_deref()),
            stripe_error_param = ?details.as_ref().and_then(|d| d.param.as_deref()),
            stripe_error_message = ?details.as_ref().and_then(|d| d.message.as_deref()),
            stripe_decline_code = ?details.as_ref().and_then(|d| d.decline_code.as_deref()),
            response_body = %body,
            context = %context,
            "stripe api request failed"
        );

        anyhow::bail!(
            "Stripe API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    async fn post_form(&self, path: &str, body: &[(String, String)]) -> Result<reqwest::Response> {
        let resp = self
            .http
            .post(format!("{}/{}", self.api_base, path))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(body)
            .send()
            .await?;

        Ok(resp)
    }

    /// Creates a hosted Checkout Session for a one-off payment.
    pub async fn create_checkout_session(
        &self,
        payment: &OneTimePayment,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<StripeCheckoutSession> {
        let body = checkout_session_form(payment, success_url, cancel_url);

        let resp = self.post_form("checkout/sessions", &body).await?;
        let resp = Self::ensure_success(resp, "create checkout session").await?;

        let session: StripeCheckoutSession = resp.json().await?;
        info!(session_id = %session.id, "stripe: checkout session created");
        Ok(session)
    }

    /// Creates a PaymentIntent whose client secret is confirmed in the browser.
    pub async fn create_payment_intent(
        &self,
        payment: &OneTimePayment,
    ) -> Result<StripePaymentIntent> {
        // https://stripe.com/docs/api/payment_intents/create
        let body = payment_intent_form(payment);

        let resp = self.post_form("payment_intents", &body).await?;
        let resp = Self::ensure_success(resp, "create payment intent").await?;

        let intent: StripePaymentIntent = resp.json().await?;
        info!(payment_intent_id = %intent.id, "stripe: payment intent created");
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> OneTimePayment {
        OneTimePayment {
            amount_minor: 25000,
            currency: "eur".into(),
            product_name: "Pro Package - Loft".into(),
            product_description: "AI image processing for pro package".into(),
            metadata: BTreeMap::from([
                ("package".to_string(), "pro".to_string()),
                ("projectId".to_string(), "p-1".to_string()),
                ("userId".to_string(), "u-1".to_string()),
            ]),
        }
    }

    fn value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn checkout_form_uses_inline_price_data() {
        let form = checkout_session_form(
            &payment(),
            "https://app.test/payment/success?session_id={CHECKOUT_SESSION_ID}",
            "https://app.test/payment/p-1",
        );

        assert_eq!(value(&form, "mode"), Some("payment"));
        assert_eq!(value(&form, "line_items[0][price_data][unit_amount]"), Some("25000"));
        assert_eq!(
            value(&form, "line_items[0][price_data][product_data][name]"),
            Some("Pro Package - Loft")
        );
        assert_eq!(value(&form, "metadata[projectId]"), Some("p-1"));
        assert_eq!(
            value(&form, "success_url"),
            Some("https://app.test/payment/success?session_id={CHECKOUT_SESSION_ID}")
        );
    }

    #[test]
    fn payment_intent_form_carries_amount_and_metadata() {
        let form = payment_intent_form(&payment());

        assert_eq!(value(&form, "amount"), Some("25000"));
        assert_eq!(value(&form, "currency"), Some("eur"));
        assert_eq!(value(&form, "metadata[userId]"), Some("u-1"));
        assert_eq!(value(&form, "line_items[0][quantity]"), None);
    }
}
