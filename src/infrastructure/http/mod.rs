use axum::{middleware, response::Json, Router};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    application::use_cases::RequestDispatcher,
    domain::repositories::ContentIndex,
    infrastructure::{
        config::{AppConfig, RuntimeMode},
        index::LazyContentIndex,
        storage::{HttpObjectProxy, ObjectProxy},
    },
    presentation::{
        handlers::stream::AppState,
        middleware::{
            assign_correlation_id, logging_middleware, server_identity, RequestLogConfig,
            ResponseSanitizer,
        },
        routes::{self, RouteTable},
    },
};

/// Create the main application router with the real index and storage clients
///
/// Neither client connects before the first request that needs it.
pub fn create_app(config: &AppConfig) -> Result<Router, routes::TemplateError> {
    let index: Arc<dyn ContentIndex> = Arc::new(LazyContentIndex::new(config.index.clone()));
    let proxy: Arc<dyn ObjectProxy> = Arc::new(HttpObjectProxy::new(&config.storage));
    create_app_with(config, index, proxy)
}

/// Create the application router around the given index and storage proxy
pub fn create_app_with(
    config: &AppConfig,
    index: Arc<dyn ContentIndex>,
    proxy: Arc<dyn ObjectProxy>,
) -> Result<Router, routes::TemplateError> {
    let state = AppState {
        dispatcher: Arc::new(RequestDispatcher::new(config, index, proxy)),
        routes: Arc::new(RouteTable::standard()?),
    };

    let log_config = match config.mode {
        RuntimeMode::Local => RequestLogConfig::default(),
        RuntimeMode::Production => RequestLogConfig::production(),
    };

    // outermost first
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(server_identity(ResponseSanitizer::new(
            &config.server.identity,
        ))))
        .layer(middleware::from_fn(assign_correlation_id))
        .layer(middleware::from_fn(logging_middleware(log_config)));

    Ok(routes::create_routes(state).layer(middleware_stack))
}

/// Health check endpoint for liveness probes
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": env!("CARGO_PKG_NAME")
    }))
}

/// Start the HTTP server
///
/// # Errors
/// Returns an error if the address is invalid or the server fails to start
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.security.key_salt.is_empty() {
        warn!("Capability key salt is empty, streaming keys are trivially derivable");
    }
    if config.index.url.is_empty() {
        warn!("Content index URL is not configured, downloads will not be checked");
    }

    let app = create_app(&config)?;
    let addr = config.server.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
