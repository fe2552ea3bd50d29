//! Place repository: buffered list and count execution

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::data::error::DataError;
use crate::data::filters::{BindValue, FilterSpec, SqlParams, count_sql, select_sql};
use crate::data::types::PlaceRow;

/// Attach collected bind values to a query in positional order
pub(crate) fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q SqlParams,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in &params.values {
        query = match value {
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Int(i) => query.bind(*i),
            BindValue::Real(r) => query.bind(*r),
        };
    }
    query
}

/// Fetch one page of matching places plus the total match count.
///
/// The count runs first over the identical WHERE clause so the pagination
/// envelope is consistent with the count endpoint for the same filters.
pub async fn list_places(
    pool: &PgPool,
    spec: &FilterSpec,
    limit: i64,
    offset: i64,
) -> Result<(Vec<PlaceRow>, i64), DataError> {
    let total = count_places(pool, spec).await?;

    let mut params = SqlParams::default();
    let sql = select_sql(spec, &mut params, limit, offset);
    let rows = bind_values(sqlx::query_as::<_, PlaceRow>(&sql), &params)
        .fetch_all(pool)
        .await?;

    Ok((rows, total))
}

/// Count matching places
pub async fn count_places(pool: &PgPool, spec: &FilterSpec) -> Result<i64, DataError> {
    let mut params = SqlParams::default();
    let sql = count_sql(spec, &mut params);
    let (count,) = bind_values(sqlx::query_as::<_, (i64,)>(&sql), &params)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
