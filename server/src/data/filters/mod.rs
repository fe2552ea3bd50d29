//! Dynamic query filters
//!
//! Translates untrusted query-string input into parameterized WHERE clauses.
//! `builder` owns the key allow-list, `types` the predicate model, and
//! `query` the statement variants built on top of it.

mod builder;
mod query;
mod types;

pub use builder::{FilterError, build_filter_spec};
pub use query::{PLACE_COLUMNS, count_sql, select_sql, stream_sql};
pub use types::{BindValue, FilterOp, FilterSpec, Predicate, SqlParams};
