//! NDJSON bulk export endpoint
//!
//! Checks one connection out of the pool for the lifetime of the export and
//! feeds a cursor-backed query through the NDJSON encoder. The connection is
//! owned by the body stream: completion, mid-stream failure, and client
//! disconnect all release it exactly once via drop.

use std::collections::HashMap;
use std::convert::Infallible;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, header};
use axum::response::Response;
use futures::StreamExt;

use crate::api::AppState;
use crate::api::types::{ApiError, ErrorBody, parse_stream_cap};
use crate::data::DataError;
use crate::data::export::ndjson_export;
use crate::data::filters::{SqlParams, build_filter_spec, stream_sql};
use crate::data::postgres::repositories::places::bind_values;
use crate::data::types::PlaceRow;

/// Stream matching places as NDJSON
#[utoipa::path(
    get,
    path = "/api/v1/places/stream",
    tag = "places",
    params(
        ("city" = Option<String>, Query, description = "Exact city match"),
        ("name_contains" = Option<String>, Query, description = "Substring match on name"),
        ("limit" = Option<i64>, Query, description = "Hard row cap (0 = unlimited, default)")
    ),
    responses(
        (status = 200, description = "application/x-ndjson: one place per line, `_meta` trailer on completion, `_error` record on mid-stream failure"),
        (status = 400, description = "Malformed numeric filter or cap", body = ErrorBody)
    )
)]
pub async fn stream_places(
    State(state): State<AppState>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let spec = build_filter_spec(&raw)?;
    let cap = parse_stream_cap(raw.get("limit").map(String::as_str))?;

    let mut params = SqlParams::default();
    let sql = stream_sql(&spec, &mut params, cap);

    // Acquire before headers are sent so pool exhaustion or a dead store is
    // an ordinary 500 rather than a broken stream.
    let conn = state
        .db
        .pool()
        .acquire()
        .await
        .map_err(|e| ApiError::from_data(DataError::from(e)))?;

    tracing::debug!(cap, filters = spec.predicates.len(), "Starting NDJSON export");

    let rows = async_stream::stream! {
        let mut conn = conn;
        let query = bind_values(sqlx::query_as::<_, PlaceRow>(&sql), &params);
        let mut rows = query.fetch(&mut *conn);
        while let Some(next) = rows.next().await {
            yield next.map_err(DataError::from);
        }
    };

    let body = Body::from_stream(ndjson_export(rows).map(Ok::<_, Infallible>));

    let mut response = Response::new(body);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/x-ndjson"),
    );
    Ok(response)
}
