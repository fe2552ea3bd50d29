//! Application-wide constants and defaults

pub const APP_NAME: &str = "placedex";

/// Log filter env var; falls back to RUST_LOG
pub const ENV_LOG: &str = "PLACES_LOG";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

pub const DB_DEFAULT_HOST: &str = "127.0.0.1";
pub const DB_DEFAULT_PORT: u16 = 5432;
pub const DB_DEFAULT_USER: &str = "postgres";
pub const DB_DEFAULT_NAME: &str = "places";
pub const DB_DEFAULT_POOL_SIZE: u32 = 20;

/// Startup connectivity: bounded attempts with a fixed backoff
pub const DB_CONNECT_ATTEMPTS: u32 = 5;
pub const DB_CONNECT_BACKOFF_SECS: u64 = 5;

/// Excess requests queue on the pool rather than fail fast; the acquire
/// timeout is a generous upper bound, not a latency target.
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 600;

pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MAX_PAGE_LIMIT: i64 = 10_000;

pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 120;
/// Sweep threshold for stale per-client rate-limit windows
pub const RATE_LIMIT_MAX_TRACKED_CLIENTS: usize = 10_000;
