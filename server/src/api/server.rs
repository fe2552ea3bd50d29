//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::auth::{AuthState, require_bearer};
use super::openapi::openapi_json;
use super::rate_limit::{RateLimitState, RateLimiter, rate_limit_middleware};
use super::routes::{health, places, stats, stream};
use super::types::ApiError;
use crate::app::CoreApp;
use crate::core::shutdown;

pub struct ApiServer;

impl ApiServer {
    pub async fn start(app: CoreApp) -> Result<()> {
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let state = AppState { db: app.db.clone() };
        let auth_state = AuthState {
            bearer_secret: app.config.auth.bearer_secret.as_deref().map(Arc::from),
        };
        let rate_limit_state = RateLimitState {
            limiter: Arc::new(RateLimiter::new(
                app.config.rate_limit.window_secs,
                app.config.rate_limit.max_requests,
            )),
        };

        // Buffered endpoints are compressed; the NDJSON export is not, so
        // every line reaches the transport as soon as it is produced.
        // Rate limiting wraps authentication (outermost runs first).
        let protected = Router::new()
            .route("/places", get(places::list_places))
            .route("/places/count", get(places::count_places))
            .route("/stats", get(stats::get_stats))
            .route_layer(CompressionLayer::new())
            .route("/places/stream", get(stream::stream_places))
            .route_layer(axum::middleware::from_fn_with_state(
                auth_state,
                require_bearer,
            ))
            .route_layer(axum::middleware::from_fn_with_state(
                rate_limit_state,
                rate_limit_middleware,
            ));

        let router = Router::new()
            .route("/health", get(health::health))
            .route("/api/v1/openapi.json", get(openapi_json))
            .nest("/api/v1", protected)
            .fallback(handle_404)
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "placedex listening");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown::signal())
        .await?;

        // Drain order: in-flight requests (exports included) have finished
        // by the time serve returns; the pool closes last.
        app.db.close().await;
        tracing::info!("Shutdown complete");
        Ok(())
    }
}

/// Unknown route → 404 envelope
async fn handle_404() -> ApiError {
    ApiError::not_found("Unknown route")
}
