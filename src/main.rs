use anyhow::{Context, Result};
use instant_cert::configs::{AppConfig, DEFAULT_CONFIG_PATH};
use instant_cert::webserver;
use log::info;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = AppConfig::load(&config_path)
        .context(format!("Failed to load configuration from {}", config_path.display()))?;
    info!(
        "Loaded configuration (port {}, fallback domain {})",
        config.server.port, config.request.fallback_domain
    );

    webserver::start_webserver(config)
}
