//! Data layer: filter construction, statement assembly, store access

pub mod error;
pub mod export;
pub mod filters;
pub mod postgres;
pub mod types;

pub use error::DataError;
pub use postgres::PostgresService;
