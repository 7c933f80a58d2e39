use std::path::Path;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

use crate::api::{self, AppState};
use crate::config::FlavorFinderConfig;

/// The full application: API under `/api`, health probe, optional
/// static frontend as the fallback.
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/health", get(api::health))
        .nest("/api", api::router(state));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

pub async fn run(config: &FlavorFinderConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let static_dir = config.server.static_dir.as_deref().map(Path::new);
    if let Some(dir) = static_dir.filter(|dir| !dir.is_dir()) {
        warn!("Static directory {} does not exist", dir.display());
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app(state, static_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;
    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
