//! PostgreSQL database service
//!
//! Owns the process-wide connection pool. Buffered list/count paths acquire
//! and release a connection implicitly around a single round trip; the
//! streaming exporter is the one code path that checks a connection out for
//! the duration of an export.

pub mod repositories;

pub use sqlx::PgPool;

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::core::config::DatabaseConfig;
use crate::core::constants::{
    DB_ACQUIRE_TIMEOUT_SECS, DB_CONNECT_ATTEMPTS, DB_CONNECT_BACKOFF_SECS,
};
use crate::data::error::DataError;
use crate::utils::retry::retry_fixed_async;

/// PostgreSQL database service
///
/// Created once at startup and shared (behind `Arc`) by every component
/// needing store access; there is no module-level singleton.
pub struct PostgresService {
    pool: PgPool,
}

impl PostgresService {
    /// Open the connection pool and verify connectivity with one round trip
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DataError> {
        if config.host.is_empty() {
            return Err(DataError::config("database host is required"));
        }

        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.dbname);

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;

        let service = Self { pool };
        service.ping().await?;

        tracing::debug!(
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            pool_size = config.pool_size,
            "PostgresService initialized"
        );
        Ok(service)
    }

    /// Startup connectivity: bounded retries with a fixed backoff, then give
    /// up so the process can exit non-zero.
    pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<Self, DataError> {
        let result = retry_fixed_async(
            DB_CONNECT_ATTEMPTS,
            Duration::from_secs(DB_CONNECT_BACKOFF_SECS),
            || Self::init(config),
        )
        .await;

        match result {
            Ok((service, attempts)) => {
                tracing::info!(attempts, "Connected to PostgreSQL");
                Ok(service)
            }
            Err((error, attempts)) => Err(DataError::unreachable(attempts, error.to_string())),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// One cheap round trip to verify the store is reachable
    pub async fn ping(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }
}

#[cfg(test)]
mod tests {
    // PostgreSQL connectivity requires a running instance and is exercised
    // as integration tests; statement assembly and parameter binding are
    // unit tested in data::filters.
}
