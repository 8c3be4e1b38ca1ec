//! HTTP surface: router, CORS policy and the serve loop.

pub mod error;
pub mod openapi;
pub mod routes;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cli::Settings;
use crate::state::AppContext;

pub use error::ApiError;

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Only `GET` with a `Content-Type` header is allowed cross-origin. A `*`
/// anywhere in `origins` allows any origin.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{}'", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE))
}

pub fn build_router(ctx: Arc<AppContext>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/sugestoes", get(routes::suggestions))
        .route("/health", get(routes::health))
        .route("/docs", get(routes::docs))
        .route("/openapi.json", get(routes::openapi))
        .fallback(routes::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Binds the listener and serves until Ctrl+C or SIGTERM. The context must
/// be fully initialized (ingestion done) before this is called.
pub async fn serve(ctx: AppContext, settings: &Settings) -> anyhow::Result<()> {
    let cors = cors_layer(&settings.cors_origin_list())?;
    let app = build_router(Arc::new(ctx), cors);

    let addr = settings.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, cors_origins = %settings.cors_origins, "Serving ingredient suggestions");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
