//! HTTP server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Qdrant connection
//! - Optional embedding and keyword-extraction setup (OpenAI)
//! - Service creation
//! - Router assembly and graceful shutdown

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use axum_helpers::{health_router, not_found, shutdown_signal};
use core_config::server::ServerConfig;
use core_config::{Environment, FromEnv, app_info, env_or_default};
use domain_points::{
    ExtractionPolicy, OpenAiConfig, OpenAiKeywordExtractor, PointService, PointsApiDoc,
    QdrantConfig, QdrantStore, handlers, openai_registry,
};
use eyre::{Result, WrapErr};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;

/// Run the HTTP server
///
/// This is the main entry point for server initialization. It:
/// 1. Sets up structured logging (env-aware: JSON for prod, pretty for dev)
/// 2. Connects to Qdrant
/// 3. Optionally initializes the OpenAI embedders and keyword extractor
/// 4. Creates the service layer and router
/// 5. Serves until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if:
/// - Qdrant configuration is invalid or the connection fails
/// - Server binding fails
/// - Server runtime encounters an error
pub async fn run() -> Result<()> {
    core_config::tracing::install_color_eyre();

    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    let qdrant_config = QdrantConfig::from_env().wrap_err("Failed to load Qdrant configuration")?;

    info!("Connecting to Qdrant at {}...", qdrant_config.url);
    let store = QdrantStore::new(qdrant_config)
        .await
        .wrap_err("Failed to connect to Qdrant")?;
    info!("Connected to Qdrant successfully");

    let mut service = PointService::new(store);

    // Optionally configure OpenAI-backed embedding and keyword extraction
    match OpenAiConfig::from_env() {
        Ok(config) => {
            info!("OpenAI embedding models configured");
            service = service
                .with_embedders(openai_registry(config.clone()))
                .with_extractor(Arc::new(OpenAiKeywordExtractor::new(config)));
        }
        Err(_) => {
            info!("No OpenAI API key found, embedding and extraction are disabled");
        }
    }

    let policy = extraction_policy_from_env();
    info!("Keyword extraction policy: {:?}", policy);
    service = service.with_extraction_policy(policy);

    let app = Router::new()
        .merge(handlers::router(service))
        .merge(health_router(app_info!()))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(PointsApiDoc::openapi()) }),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http());

    let server_config = ServerConfig::from_env().wrap_err("Failed to load server configuration")?;
    let address = server_config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("Failed to bind to {}", address))?;
    info!("points-api listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("HTTP server failed")?;

    Ok(())
}

/// EXTRACTION_POLICY=fail makes extraction failures fail the request;
/// anything else falls back to embedding the raw input
fn extraction_policy_from_env() -> ExtractionPolicy {
    if env_or_default("EXTRACTION_POLICY", "fallback").eq_ignore_ascii_case("fail") {
        ExtractionPolicy::Fail
    } else {
        ExtractionPolicy::FallbackToInput
    }
}
