//! # Extension Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLING_DIRECTORY_PATH=/srv/billing/clinics.json                   │
//! │     BILLING_LOG_FILTER=debug                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/custom-billing/billing.toml (Linux)                      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     bundled clinic directory, "info,billing=debug"                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [directory]
//! path = "/srv/billing/clinics.json"
//!
//! [logging]
//! filter = "info,billing=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use billing_directory::{ClinicDirectory, DirectoryResult};

// =============================================================================
// Config Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Settings
// =============================================================================

/// Where the clinic tables come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySettings {
    /// JSON data file. `None` uses the bundled sample set.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,billing=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

/// Complete extension configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionConfig {
    #[serde(default)]
    pub directory: DirectorySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ExtensionConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (billing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::resolve_path(config_path) {
            if path.exists() {
                info!(?path, "Loading extension config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load extension config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `BILLING_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("BILLING_DIRECTORY_PATH") {
            debug!(path = %path, "Overriding clinic directory path from environment");
            self.directory.path = Some(PathBuf::from(path));
        }

        if let Some(filter) = lookup("BILLING_LOG_FILTER") {
            self.logging.filter = filter;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.filter must not be empty".into()));
        }

        if let Some(path) = &self.directory.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("directory.path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Loads the configured clinic directory.
    pub fn load_directory(&self) -> DirectoryResult<ClinicDirectory> {
        match self.directory.path.as_deref() {
            Some(path) => ClinicDirectory::from_path(path),
            None => ClinicDirectory::bundled(),
        }
    }

    pub fn directory_path(&self) -> Option<&Path> {
        self.directory.path.as_deref()
    }

    /// The file `load` reads: the explicit path, else the platform default.
    pub fn resolve_path(config_path: Option<PathBuf>) -> Option<PathBuf> {
        config_path.or_else(Self::default_config_path)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "custom-billing", "billing")
            .map(|dirs| dirs.config_dir().join("billing.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtensionConfig::default();
        assert_eq!(config.directory_path(), None);
        assert_eq!(config.logging.filter, "info,billing=debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_parsing() {
        let config = ExtensionConfig::from_toml_str(
            r#"
            [directory]
            path = "/srv/billing/clinics.json"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.directory_path(),
            Some(Path::new("/srv/billing/clinics.json"))
        );
        // Missing section falls back to defaults.
        assert_eq!(config.logging.filter, "info,billing=debug");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ExtensionConfig::from_toml_str("[directory\npath = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = ExtensionConfig::default();
        config.apply_overrides(|key| match key {
            "BILLING_DIRECTORY_PATH" => Some("/tmp/clinics.json".to_string()),
            "BILLING_LOG_FILTER" => Some("warn".to_string()),
            _ => None,
        });
        assert_eq!(config.directory_path(), Some(Path::new("/tmp/clinics.json")));
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_validation() {
        let mut config = ExtensionConfig::default();
        config.logging.filter = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ExtensionConfig::default();
        config.directory.path = Some(PathBuf::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = ExtensionConfig::load_or_default(Some(PathBuf::from(
            "/nonexistent/custom-billing/billing.toml",
        )));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_path_prefers_explicit_file() {
        let explicit = PathBuf::from("/srv/billing/billing.toml");
        assert_eq!(
            ExtensionConfig::resolve_path(Some(explicit.clone())),
            Some(explicit)
        );

        if let Some(default) = ExtensionConfig::resolve_path(None) {
            assert!(default.ends_with("billing.toml"));
        }
    }

    #[test]
    fn test_load_bundled_directory() {
        let directory = ExtensionConfig::default().load_directory().unwrap();
        assert!(!directory.provinces.is_empty());
    }
}
