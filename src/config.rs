//! Configuration module
//!
//! Settings are read from a TOML file
//! (`~/.config/domain-registry/config.toml` by default). Every field has a
//! default, so a partial file or no file at all is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::application::events::event_bus::DEFAULT_CAPACITY;
use crate::infrastructure::database::{DatabaseConfig, DEFAULT_DATABASE_URL};
use crate::support::errors::InfraError;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub events: EventsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directive, e.g. "info" or "domain_registry=debug"
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsSection {
    /// Capacity of the broadcast channel behind the event bus
    pub bus_capacity: usize,
}

impl Default for EventsSection {
    fn default() -> Self {
        Self {
            bus_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InfraError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, InfraError> {
        let cfg: Self = toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.database.url.trim().is_empty() {
            return Err(InfraError::Config("database.url must not be empty".into()));
        }
        if self.logging.level.trim().is_empty() {
            return Err(InfraError::Config("logging.level must not be empty".into()));
        }
        tracing_subscriber::EnvFilter::try_new(&self.logging.level).map_err(|e| {
            InfraError::Config(format!("logging.level '{}': {}", self.logging.level, e))
        })?;
        if self.events.bus_capacity == 0 {
            return Err(InfraError::Config("events.bus_capacity must be positive".into()));
        }
        Ok(())
    }

    /// Apply command-line overrides and re-validate the result
    pub fn apply_overrides(
        &mut self,
        database_url: Option<String>,
        log_level: Option<String>,
    ) -> Result<(), InfraError> {
        if let Some(url) = database_url {
            self.database.url = url;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        self.validate()
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }
}

/// `<config dir>/domain-registry/config.toml`, or `./config.toml` when the
/// platform has no config directory
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("domain-registry").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
