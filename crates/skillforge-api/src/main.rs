//! SkillForge API server entry point

use anyhow::{Context, Result};
use skillforge_api::{ApiServer, ConfigManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let manager = ConfigManager::from_env();
    let config = manager
        .load()
        .with_context(|| format!("loading {}", manager.config_path().display()))?;

    tracing::info!(
        config = %manager.config_path().display(),
        host = %config.server.host,
        port = config.server.port,
        "Starting SkillForge API"
    );

    ApiServer::new(config)?.run().await
}
