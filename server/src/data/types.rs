//! Row types shared between the repositories and the API layer

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One business-place record as projected by the gateway.
///
/// The projection is the full stored record minus the opaque text blobs
/// (`working_hours`, `about`), which are never served. Every column except
/// `id` and `place_id` is nullable in the source data.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct PlaceRow {
    pub id: i64,
    pub place_id: String,
    pub name: Option<String>,
    pub site: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    pub phone: Option<String>,
    pub full_address: Option<String>,
    pub borough: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub county_code: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
}

/// One distinct value with its row count, used by the top-10 aggregations
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValueCount {
    pub value: String,
    pub count: i64,
}

/// Whole-table aggregate statistics.
///
/// Tie order within a top-10 list is store-defined; the queries order by
/// count only.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaceStats {
    pub total_places: i64,
    pub top_cities: Vec<ValueCount>,
    pub top_types: Vec<ValueCount>,
    pub top_county_codes: Vec<ValueCount>,
}
