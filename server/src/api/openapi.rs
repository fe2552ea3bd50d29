//! OpenAPI document

use axum::Json;
use utoipa::OpenApi;

use crate::api::routes::health::{HealthData, HealthResponse};
use crate::api::routes::places::{CountData, CountResponse, PlacesResponse};
use crate::api::routes::stats::StatsResponse;
use crate::api::types::{ErrorBody, PaginationMeta};
use crate::data::types::{PlaceRow, PlaceStats, ValueCount};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "placedex",
        description = "REST/NDJSON gateway over business-place records"
    ),
    paths(
        crate::api::routes::health::health,
        crate::api::routes::places::list_places,
        crate::api::routes::places::count_places,
        crate::api::routes::stream::stream_places,
        crate::api::routes::stats::get_stats,
    ),
    components(schemas(
        PlaceRow,
        PlaceStats,
        ValueCount,
        PaginationMeta,
        ErrorBody,
        PlacesResponse,
        CountResponse,
        CountData,
        StatsResponse,
        HealthResponse,
        HealthData,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
