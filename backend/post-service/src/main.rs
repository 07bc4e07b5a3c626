use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{bail, Context};
use post_service::config::{Config, StoreBackend};
use post_service::db::{self, InMemoryPostStore, PgPostStore, PostStore};
use post_service::handlers;
use post_service::middleware::{
    IdentityProvider, JwtIdentityProvider, MetricsMiddleware, RejectingIdentityProvider,
};
use post_service::openapi::{self, ApiDoc};
use post_service::services::PostService;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Probe the local health endpoint; used as the container healthcheck
async fn run_healthcheck() -> anyhow::Result<()> {
    let port = std::env::var("POST_SERVICE_PORT").unwrap_or_else(|_| "8085".to_string());
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);

    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .context("healthcheck request failed")?;

    if !resp.status().is_success() {
        bail!("healthcheck HTTP status: {}", resp.status());
    }
    Ok(())
}

fn identity_provider(config: &Config) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    match config.auth.jwt_public_key_pem.as_deref() {
        Some(pem) => {
            let provider =
                JwtIdentityProvider::from_rsa_pem(pem).context("Failed to load JWT public key")?;
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!(
                "JWT public key not configured; authenticated routes will reject every request"
            );
            Ok(Arc::new(RejectingIdentityProvider))
        }
    }
}

async fn post_store(config: &Config) -> anyhow::Result<Arc<dyn PostStore>> {
    match config.posts.store_backend {
        StoreBackend::Postgres => {
            let pool = db::create_pool(&config.database)
                .await
                .context("Failed to create database pool")?;

            if config.database.run_migrations {
                db::run_migrations(&pool)
                    .await
                    .context("Failed to run database migrations")?;
            }

            tracing::info!("Using PostgreSQL post store");
            Ok(Arc::new(PgPostStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory post store; posts are lost on restart");
            Ok(Arc::new(InMemoryPostStore::new()))
        }
    }
}

/// Post Service
///
/// Serves the social feed posts API under `/api/posts`, plus health probes,
/// Prometheus metrics and the OpenAPI document.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        return run_healthcheck().await;
    }

    // Missing .env is fine outside local development
    let _ = dotenvy::dotenv();

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to load configuration")?;

    init_tracing(config.app.json_logs);

    tracing::info!("Starting post-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let identity = identity_provider(&config)?;
    let store = post_store(&config).await?;
    let service = web::Data::new(PostService::with_max_save_attempts(
        store,
        config.posts.max_save_attempts,
    ));
    let identity_data: web::Data<dyn IdentityProvider> = web::Data::from(identity);
    let openapi_doc = web::Data::new(ApiDoc::openapi());

    let bind_address = config.bind_address();
    let allowed_origins = config.cors.allowed_origins.clone();
    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(service.clone())
            .app_data(identity_data.clone())
            .app_data(openapi_doc.clone())
            .wrap(MetricsMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(post_service::metrics::serve_metrics),
            )
            .route(
                ApiDoc::openapi_json_path(),
                web::get().to(openapi::openapi_json),
            )
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            result
                .context("HTTP server task panicked")?
                .context("HTTP server failed")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task
                .await
                .context("HTTP server task panicked")?
                .context("HTTP server failed")?;
        }
    }

    tracing::info!("post-service shut down");
    Ok(())
}
