use crate::{
    auth::JwtSecret,
    axum_http::{default_routers, routers},
    config::{config_loader, config_model::DotEnvyConfig, stage::Stage},
    usecases::{confirmations::DestructiveConfirmations, uploads::UploadTracker},
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::{
    ai::gemini_client::GeminiClient,
    infra::{
        db::postgres::postgres_connection::PgPoolSquad,
        storages::supabase_storage::{SupabaseStorageClient, SupabaseStorageConfig},
    },
    payments::stripe_client::StripeClient,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

fn cors_layer(stage: Stage, site_url: &str) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let cors = match stage {
        Stage::Production => cors
            .allow_origin(AllowOrigin::exact(HeaderValue::from_str(site_url)?))
            .allow_credentials(true),
        Stage::Local | Stage::Development => cors.allow_origin(Any),
    };
    Ok(cors)
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let stage = config_loader::get_stage();

    let storage = Arc::new(
        SupabaseStorageClient::new(SupabaseStorageConfig {
            endpoint: config.supabase.storage.endpoint.clone(),
            region: config.supabase.storage.region.clone(),
            bucket: config.supabase.storage.bucket.clone(),
            access_key: config.supabase.storage.access_key.clone(),
            secret_key: config.supabase.storage.secret_key.clone(),
        })
        .await?,
    );
    let stripe = Arc::new(StripeClient::new(config.stripe.secret_key.clone()));
    let gemini = Arc::new(GeminiClient::new(
        config.gemini.api_key.clone(),
        config.gemini.model.clone(),
    ));
    let upload_tracker = Arc::new(UploadTracker::new());
    let confirmations = Arc::new(DestructiveConfirmations::default());
    let jwt_secret = Arc::new(JwtSecret(config.supabase.jwt_secret.clone()));

    let json_api = Router::new()
        .merge(routers::projects::routes(
            Arc::clone(&db_pool),
            Arc::clone(&storage),
        ))
        .merge(routers::processing::routes(Arc::clone(&db_pool)))
        .merge(routers::deletions::routes(
            Arc::clone(&db_pool),
            Arc::clone(&storage),
            confirmations,
        ))
        .merge(routers::checkout::routes(
            Arc::clone(&db_pool),
            stripe,
            config.stripe.site_url.clone(),
        ))
        .merge(routers::downloads::routes(
            Arc::clone(&db_pool),
            Arc::clone(&storage),
        ))
        .merge(routers::descriptions::routes(gemini))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .merge(json_api)
        .merge(routers::project_images::routes(
            Arc::clone(&db_pool),
            storage,
            upload_tracker,
        ))
        .merge(routers::project_events::routes(
            Arc::clone(&db_pool),
            Duration::from_millis(config.realtime.poll_interval_ms),
        ))
        .route("/api/health-check", get(default_routers::health_check))
        .layer(Extension(jwt_secret))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(cors_layer(stage, &config.stripe.site_url)?)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(%stage, port = config.backend_server.port, "Server is running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
