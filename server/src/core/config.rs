//! Environment-style configuration
//!
//! All settings come from `PLACES_*` environment variables (a `.env` file is
//! honored). Missing values fall back to the defaults in `constants`;
//! unparseable values are loud errors rather than silent defaults.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use super::constants::{
    DB_DEFAULT_HOST, DB_DEFAULT_NAME, DB_DEFAULT_POOL_SIZE, DB_DEFAULT_PORT, DB_DEFAULT_USER,
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT_MAX_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS,
};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bearer secret for the non-health endpoints; None when unset (requests
    /// then fail with a configuration error)
    pub bearer_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: env_or("PLACES_HOST", DEFAULT_HOST),
                port: env_parse("PLACES_PORT", DEFAULT_PORT)?,
            },
            database: DatabaseConfig {
                host: env_or("PLACES_DB_HOST", DB_DEFAULT_HOST),
                port: env_parse("PLACES_DB_PORT", DB_DEFAULT_PORT)?,
                user: env_or("PLACES_DB_USER", DB_DEFAULT_USER),
                password: env_or("PLACES_DB_PASSWORD", ""),
                dbname: env_or("PLACES_DB_NAME", DB_DEFAULT_NAME),
                pool_size: env_parse("PLACES_DB_POOL_SIZE", DB_DEFAULT_POOL_SIZE)?,
            },
            auth: AuthConfig {
                bearer_secret: env::var("PLACES_API_KEY")
                    .ok()
                    .filter(|s| !s.is_empty()),
            },
            rate_limit: RateLimitConfig {
                window_secs: env_parse(
                    "PLACES_RATE_LIMIT_WINDOW_SECS",
                    DEFAULT_RATE_LIMIT_WINDOW_SECS,
                )?,
                max_requests: env_parse(
                    "PLACES_RATE_LIMIT_MAX_REQUESTS",
                    DEFAULT_RATE_LIMIT_MAX_REQUESTS,
                )?,
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
