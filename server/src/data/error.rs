//! Unified error type for the data layer

use thiserror::Error;

/// Errors produced by store access
#[derive(Error, Debug)]
pub enum DataError {
    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store could not be reached within the startup retry budget
    #[error("Store unreachable after {attempts} attempts: {error}")]
    Unreachable { attempts: u32, error: String },
}

impl DataError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn unreachable(attempts: u32, error: impl Into<String>) -> Self {
        Self::Unreachable {
            attempts,
            error: error.into(),
        }
    }

    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Postgres(e) => {
                matches!(
                    e,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                )
            }
            Self::Unreachable { .. } => true,
            Self::Config(_) => false,
        }
    }
}
