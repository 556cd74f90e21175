//! Configuration management for the BikeCast service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::BikecastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the BikeCast service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BikecastConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Forecast engine selection
    #[serde(default)]
    pub engine: EngineConfig,
    /// Remote inference backend
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with a built frontend to serve as fallback
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Minutes without activity before a session is discarded
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,
}

/// Which provider answers forecast requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    #[default]
    Simulated,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub mode: EngineMode,
    /// Simulated latency in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Fixed seed for reproducible jitter
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Full URL of the inference endpoint
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_remote_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_session_idle_minutes() -> u64 {
    30
}

fn default_latency_ms() -> u64 {
    2000
}

fn default_remote_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            session_idle_minutes: default_session_idle_minutes(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::default(),
            latency_ms: default_latency_ms(),
            seed: None,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_seconds: default_remote_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl BikecastConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var("BIKECAST_CONFIG").ok().map(PathBuf::from);
        Self::load_from_path(path)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. BIKECAST_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("BIKECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: BikecastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    #[must_use]
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.session_idle_minutes * 60)
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.session_idle_minutes == 0 {
            self.server.session_idle_minutes = default_session_idle_minutes();
        }
        if self.remote.timeout_seconds == 0 {
            self.remote.timeout_seconds = default_remote_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_engine()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_engine(&self) -> Result<()> {
        if self.engine.mode != EngineMode::Remote {
            return Ok(());
        }

        match self.remote.endpoint.as_deref() {
            None | Some("") => Err(BikecastError::config(
                "Remote engine mode requires remote.endpoint to be set",
            )
            .into()),
            Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                Err(BikecastError::config(
                    "Remote endpoint must be a valid HTTP or HTTPS URL",
                )
                .into())
            }
            Some(_) => Ok(()),
        }
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(BikecastError::config("Server port cannot be 0").into());
        }

        if self.server.session_idle_minutes > 24 * 60 {
            return Err(
                BikecastError::config("Session idle timeout cannot exceed 1440 minutes").into(),
            );
        }

        if self.engine.latency_ms > 60_000 {
            return Err(
                BikecastError::config("Simulated latency cannot exceed 60000 ms").into(),
            );
        }

        if self.remote.timeout_seconds > 300 {
            return Err(
                BikecastError::config("Remote timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(BikecastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(BikecastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
