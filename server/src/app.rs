//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, ENV_LOG};
use crate::data::PostgresService;

pub struct CoreApp {
    pub config: AppConfig,
    pub db: Arc<PostgresService>,
}

impl CoreApp {
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let config = AppConfig::load()?;
        let db = Arc::new(
            PostgresService::connect_with_retry(&config.database)
                .await
                .context("store unreachable at startup")?,
        );

        let app = Self { config, db };
        ApiServer::start(app).await
    }

    fn init_logging() {
        let default_filter = format!("info,{APP_NAME}=info");

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}
