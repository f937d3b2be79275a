//! Configuration module for empire-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::{EventsConfig as FileEventsConfig, FileConfig};
use empire_core::config::{EventBackend, EventsConfig, EventsConfigError, WebhookConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid events configuration: {0}")]
    Events(#[from] EventsConfigError),
}

/// Server configuration with runtime values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub events: EventsConfig,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
    backend_override: Option<EventBackend>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(
        config_path: impl AsRef<Path>,
        listen_override: Option<SocketAddr>,
        backend_override: Option<EventBackend>,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
            backend_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file means all defaults)
    /// 2. Apply CLI overrides
    /// 3. Build and validate the runtime configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = if self.config_path.exists() {
            let config_content = std::fs::read_to_string(&self.config_path)?;
            toml::from_str(&config_content)?
        } else {
            tracing::warn!(
                path = %self.config_path.display(),
                "Config file not found, using defaults"
            );
            FileConfig::default()
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }
        if let Some(backend) = self.backend_override {
            file_config.events.backend = backend;
        }

        let events = convert_events(file_config.events)?;
        events.validate()?;

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
            },
            events,
        })
    }
}

fn convert_events(e: FileEventsConfig) -> Result<EventsConfig, EventsConfigError> {
    let webhook = match e.webhook {
        Some(w) => {
            let mut config = WebhookConfig::new(
                Url::parse(&w.url)?,
                w.secret.map(|s| s.into_bytes().into_boxed_slice()),
            );
            config.timeout = Duration::from_secs(w.timeout_secs);
            Some(config)
        }
        None => None,
    };

    Ok(EventsConfig {
        backend: e.backend,
        asynchronous: e.asynchronous,
        buffer: e.buffer,
        webhook,
    })
}
