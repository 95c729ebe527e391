use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::request::DEFAULT_FALLBACK_DOMAIN;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
const PORT_ENV_VAR: &str = "PORT";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub request: RequestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequestConfig {
    /// Domain used when the request text carries no link
    #[serde(default = "default_fallback_domain")]
    pub fallback_domain: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            fallback_domain: default_fallback_domain(),
        }
    }
}

fn default_fallback_domain() -> String {
    DEFAULT_FALLBACK_DOMAIN.to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig =
            toml::from_str(&config_str).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from `path` if it exists, then apply the `PORT` override
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_file_or_default(path)?
            .with_port_override(std::env::var(PORT_ENV_VAR).ok().as_deref())
    }

    fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace the listen port with `port` when it is set and non-empty
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<Self> {
        if let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .context(format!("Invalid {} value: {}", PORT_ENV_VAR, port))?;
        }
        Ok(self)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .context(format!(
                "Invalid listen address {}:{}",
                self.server.host, self.server.port
            ))
    }
}
