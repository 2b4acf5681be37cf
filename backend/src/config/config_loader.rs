use anyhow::{Context, Result};

use crate::config::{
    config_model::{
        BackendServer, Database, DotEnvyConfig, Gemini, Realtime, Stripe, Supabase,
        SupabaseStorage,
    },
    stage::Stage,
};

const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_BUCKET: &str = "project-images";

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is invalid"))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional(key) {
        Some(raw) => raw.parse().with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", 10)?,
    };

    let project_url = required("SUPABASE_PROJECT_URL")?;
    let storage = SupabaseStorage {
        endpoint: optional("SUPABASE_S3_ENDPOINT").unwrap_or_else(|| {
            format!("{}/storage/v1/s3", project_url.trim_end_matches('/'))
        }),
        region: required("SUPABASE_S3_REGION")?,
        bucket: optional("SUPABASE_IMAGE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        access_key: required("SUPABASE_S3_ACCESS_KEY_ID")?,
        secret_key: required("SUPABASE_S3_SECRET_ACCESS_KEY")?,
    };

    let supabase = Supabase {
        project_url,
        jwt_secret: required("SUPABASE_JWT_SECRET")?,
        storage,
    };

    let stripe = Stripe {
        secret_key: required("STRIPE_SECRET_KEY")?,
        site_url: optional("SITE_URL")
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
            .trim_end_matches('/')
            .to_string(),
    };

    let gemini = Gemini {
        api_key: required("GEMINI_API_KEY")?,
        model: optional("GEMINI_MODEL"),
    };

    let realtime = Realtime {
        poll_interval_ms: parsed_or("REALTIME_POLL_INTERVAL_MS", 2000)?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        supabase,
        stripe,
        gemini,
        realtime,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(&stage_str).unwrap_or_default()
}
