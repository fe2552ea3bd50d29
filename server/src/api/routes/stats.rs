//! Aggregate statistics endpoint

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::api::types::{ApiError, ErrorBody};
use crate::data::postgres::repositories::stats;
use crate::data::types::PlaceStats;

#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub data: PlaceStats,
}

/// Whole-table aggregate statistics (filter-independent)
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Total count and top-10 breakdowns", body = StatsResponse),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let data = stats::place_stats(state.db.pool())
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(StatsResponse {
        success: true,
        data,
    }))
}
