//! Aggregate statistics repository
//!
//! Four independent whole-table aggregations; filters never apply here.

use sqlx::PgPool;

use crate::data::error::DataError;
use crate::data::types::{PlaceStats, ValueCount};

/// Run the fixed aggregate queries
pub async fn place_stats(pool: &PgPool) -> Result<PlaceStats, DataError> {
    let (total_places,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM places")
        .fetch_one(pool)
        .await?;

    let top_cities = top_values(pool, "city").await?;
    let top_types = top_values(pool, "type").await?;
    let top_county_codes = top_values(pool, "county_code").await?;

    Ok(PlaceStats {
        total_places,
        top_cities,
        top_types,
        top_county_codes,
    })
}

/// Top-10 non-null values of a column by row count.
///
/// `column` is a compile-time constant from the three call sites above,
/// never user input.
async fn top_values(pool: &PgPool, column: &'static str) -> Result<Vec<ValueCount>, DataError> {
    let sql = format!(
        "SELECT {column}, COUNT(*) FROM places WHERE {column} IS NOT NULL \
         GROUP BY {column} ORDER BY COUNT(*) DESC LIMIT 10"
    );
    let rows = sqlx::query_as::<_, (String, i64)>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect())
}
