use super::*;
use axum::http::Request;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";
const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn claims(exp: usize, aud: &str) -> SupabaseClaims {
    SupabaseClaims {
        sub: USER_ID.to_string(),
        role: "authenticated".to_string(),
        aud: aud.to_string(),
        email: Some("test@example.com".to_string()),
        exp,
    }
}

fn token(claims: &SupabaseClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn parts_with(header: Option<(&str, String)>) -> Parts {
    let mut builder = Request::builder().uri("/api/projects");
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    parts
        .extensions
        .insert(Arc::new(JwtSecret(SECRET.to_string())));
    parts
}

#[test]
fn test_validate_supabase_jwt_success() {
    let my_claims = claims(9999999999, "authenticated");
    let token = token(&my_claims, SECRET);

    let claims = validate_supabase_jwt(&token, SECRET).expect("Valid token should pass");
    assert_eq!(claims.sub, my_claims.sub);
    assert_eq!(claims.email, my_claims.email);
}

#[test]
fn test_validate_supabase_jwt_expired() {
    let token = token(&claims(1, "authenticated"), SECRET);

    assert!(validate_supabase_jwt(&token, SECRET).is_err());
}

#[test]
fn test_validate_supabase_jwt_invalid_signature() {
    let token = token(&claims(9999999999, "authenticated"), "wrongsecret");

    assert!(validate_supabase_jwt(&token, SECRET).is_err());
}

#[test]
fn test_validate_supabase_jwt_wrong_audience() {
    let token = token(&claims(9999999999, "anon"), SECRET);

    assert!(validate_supabase_jwt(&token, SECRET).is_err());
}

#[tokio::test]
async fn extractor_accepts_bearer_header() {
    let token = token(&claims(9999999999, "authenticated"), SECRET);
    let mut parts = parts_with(Some(("authorization", format!("Bearer {token}"))));

    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.user_id.to_string(), USER_ID);
    assert_eq!(user.email.as_deref(), Some("test@example.com"));
}

#[tokio::test]
async fn extractor_falls_back_to_session_cookie() {
    let token = token(&claims(9999999999, "authenticated"), SECRET);
    let mut parts = parts_with(Some(("cookie", format!("{ACCESS_TOKEN_COOKIE}={token}"))));

    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.user_id.to_string(), USER_ID);
}

#[tokio::test]
async fn extractor_rejects_missing_token() {
    let mut parts = parts_with(None);

    let result = AuthUser::from_request_parts(&mut parts, &()).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn extractor_rejects_non_bearer_scheme() {
    let mut parts = parts_with(Some(("authorization", "Basic abc".to_string())));

    let result = AuthUser::from_request_parts(&mut parts, &()).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}
