use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::axum_http::error_responses::AppError;

/// Cookie set by the Supabase browser client after sign-in.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

#[derive(Debug, Serialize, Deserialize)]
pub struct SupabaseClaims {
    pub sub: String,
    pub role: String,
    pub aud: String,
    pub email: Option<String>,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// HS256 secret used to verify Supabase access tokens, shared through a request extension.
#[derive(Clone)]
pub struct JwtSecret(pub String);

pub fn validate_supabase_jwt(token: &str, secret: &str) -> anyhow::Result<SupabaseClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.set_audience(&["authenticated", "service_role"]);

    let token_data = decode::<SupabaseClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

/// `Authorization: Bearer <token>` first, then the Supabase session cookie.
fn extract_token(parts: &Parts) -> Result<String, &'static str> {
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let value = header
            .to_str()
            .map_err(|_| "Invalid Authorization header")?;
        return value
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
            .ok_or("Invalid Authorization header format");
    }

    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or("Missing access token")
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let secret = parts
            .extensions
            .get::<Arc<JwtSecret>>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("JWT secret extension missing")))?;

        let token = extract_token(parts).map_err(|reason| {
            debug!(reason, "auth: request rejected");
            AppError::Unauthorized
        })?;

        let claims = validate_supabase_jwt(&token, &secret.0).map_err(|err| {
            debug!(error = %err, "auth: token rejected");
            AppError::Unauthorized
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            debug!(sub = %claims.sub, "auth: token subject is not a uuid");
            AppError::Unauthorized
        })?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests;
