//! Place list and count endpoints

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Query, State};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::api::AppState;
use crate::api::types::{ApiError, ErrorBody, PaginationMeta, parse_limit, parse_offset};
use crate::data::filters::build_filter_spec;
use crate::data::postgres::repositories::places;
use crate::data::types::PlaceRow;

#[derive(Serialize, ToSchema)]
pub struct PlacesResponse {
    pub success: bool,
    pub data: Vec<PlaceRow>,
    pub pagination: PaginationMeta,
    /// Recognized filter key/value pairs, echoed in rule order
    #[schema(value_type = Object)]
    pub filters_applied: Map<String, Value>,
}

#[derive(Serialize, ToSchema)]
pub struct CountData {
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct CountResponse {
    pub success: bool,
    pub data: CountData,
    #[schema(value_type = Object)]
    pub filters_applied: Map<String, Value>,
}

/// List places with filters and offset pagination
#[utoipa::path(
    get,
    path = "/api/v1/places",
    tag = "places",
    params(
        ("city" = Option<String>, Query, description = "Exact city match"),
        ("state" = Option<String>, Query, description = "Exact state match"),
        ("type" = Option<String>, Query, description = "Exact place type match"),
        ("county" = Option<String>, Query, description = "Exact county match"),
        ("county_code" = Option<String>, Query, description = "Exact county code match"),
        ("borough" = Option<String>, Query, description = "Exact borough match"),
        ("place_id" = Option<String>, Query, description = "Exact place id match"),
        ("country" = Option<String>, Query, description = "Exact country match"),
        ("country_code" = Option<String>, Query, description = "Exact country code match"),
        ("reviews" = Option<i64>, Query, description = "Exact review count"),
        ("rating" = Option<f64>, Query, description = "Exact rating"),
        ("reviews_min" = Option<i64>, Query, description = "Minimum review count"),
        ("reviews_max" = Option<i64>, Query, description = "Maximum review count"),
        ("rating_min" = Option<f64>, Query, description = "Minimum rating"),
        ("rating_max" = Option<f64>, Query, description = "Maximum rating"),
        ("name_contains" = Option<String>, Query, description = "Substring match on name"),
        ("limit" = Option<i64>, Query, description = "Page size (default 100, max 10000)"),
        ("offset" = Option<i64>, Query, description = "Page offset (default 0)")
    ),
    responses(
        (status = 200, description = "Matching places with pagination metadata", body = PlacesResponse),
        (status = 400, description = "Malformed numeric filter", body = ErrorBody)
    )
)]
pub async fn list_places(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let spec = build_filter_spec(&raw)?;
    let limit = parse_limit(raw.get("limit").map(String::as_str));
    let offset = parse_offset(raw.get("offset").map(String::as_str));

    let (rows, total) = places::list_places(state.db.pool(), &spec, limit, offset)
        .await
        .map_err(ApiError::from_data)?;

    let count = rows.len() as i64;
    tracing::debug!(count, total, limit, offset, "Place list query results");

    Ok(Json(PlacesResponse {
        success: true,
        data: rows,
        pagination: PaginationMeta::new(limit, offset, count, total),
        filters_applied: spec.applied,
    }))
}

/// Count places matching the same filters as the list endpoint
#[utoipa::path(
    get,
    path = "/api/v1/places/count",
    tag = "places",
    params(
        ("city" = Option<String>, Query, description = "Exact city match"),
        ("name_contains" = Option<String>, Query, description = "Substring match on name")
    ),
    responses(
        (status = 200, description = "Matching row count", body = CountResponse),
        (status = 400, description = "Malformed numeric filter", body = ErrorBody)
    )
)]
pub async fn count_places(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Json<CountResponse>, ApiError> {
    let spec = build_filter_spec(&raw)?;

    let count = places::count_places(state.db.pool(), &spec)
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(CountResponse {
        success: true,
        data: CountData { count },
        filters_applied: spec.applied,
    }))
}
