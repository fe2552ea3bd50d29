//! Statement assembly
//!
//! Three statement variants share one WHERE clause: buffered row fetch,
//! COUNT(*), and the streaming fetch with an optional hard row cap. Rows are
//! always ordered by `id` ascending so LIMIT/OFFSET pagination and streaming
//! cursors stay stable under concurrent writes to the source table.

use super::types::{BindValue, FilterSpec, SqlParams};

/// The fixed column projection (19 named columns, never `SELECT *`)
pub const PLACE_COLUMNS: &str = "id, place_id, name, site, type, phone, full_address, borough, \
     street, city, state, county, county_code, country, country_code, latitude, longitude, \
     rating, reviews";

const PLACES_TABLE: &str = "places";

/// Buffered row fetch with bound LIMIT/OFFSET
pub fn select_sql(spec: &FilterSpec, params: &mut SqlParams, limit: i64, offset: i64) -> String {
    let mut sql = format!(
        "SELECT {PLACE_COLUMNS} FROM {PLACES_TABLE}{} ORDER BY id ASC",
        spec.where_clause(params)
    );
    let limit_slot = params.push(BindValue::Int(limit));
    let offset_slot = params.push(BindValue::Int(offset));
    sql.push_str(&format!(" LIMIT {limit_slot} OFFSET {offset_slot}"));
    sql
}

/// COUNT(*) over the identical WHERE clause
pub fn count_sql(spec: &FilterSpec, params: &mut SqlParams) -> String {
    format!(
        "SELECT COUNT(*) FROM {PLACES_TABLE}{}",
        spec.where_clause(params)
    )
}

/// Streaming row fetch; `cap` of 0 means unlimited
pub fn stream_sql(spec: &FilterSpec, params: &mut SqlParams, cap: i64) -> String {
    let mut sql = format!(
        "SELECT {PLACE_COLUMNS} FROM {PLACES_TABLE}{} ORDER BY id ASC",
        spec.where_clause(params)
    );
    if cap > 0 {
        let cap_slot = params.push(BindValue::Int(cap));
        sql.push_str(&format!(" LIMIT {cap_slot}"));
    }
    sql
}
