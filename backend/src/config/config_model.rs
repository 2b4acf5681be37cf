#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub supabase: Supabase,
    pub stripe: Stripe,
    pub gemini: Gemini,
    pub realtime: Realtime,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// Megabytes, applied to JSON routes. Uploads use `MAX_UPLOAD_BYTES` per file.
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Supabase {
    pub project_url: String,
    pub jwt_secret: String,
    pub storage: SupabaseStorage,
}

#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone)]
pub struct Stripe {
    pub secret_key: String,
    /// Base URL of the web app, used for Checkout success/cancel redirects.
    pub site_url: String,
}

#[derive(Debug, Clone)]
pub struct Gemini {
    pub api_key: String,
    pub model: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Realtime {
    pub poll_interval_ms: u64,
}
