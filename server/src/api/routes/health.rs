//! Health check endpoint

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::api::types::{ApiError, ErrorBody};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: &'static str,
    pub store: &'static str,
    pub version: &'static str,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub data: HealthData,
}

/// Liveness plus one store round trip
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store are healthy", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = ErrorBody)
    )
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.db.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Health check failed");
        ApiError::service_unavailable("Store is unreachable")
    })?;

    Ok(Json(HealthResponse {
        success: true,
        data: HealthData {
            status: "ok",
            store: "reachable",
            version: env!("CARGO_PKG_VERSION"),
        },
    }))
}
