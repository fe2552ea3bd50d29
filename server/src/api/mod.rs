//! HTTP API surface

pub mod auth;
pub mod openapi;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod types;

use std::sync::Arc;

use crate::data::PostgresService;

pub use server::ApiServer;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PostgresService>,
}
