//! Optional TOML configuration file.
//!
//! ```toml
//! [appliance]
//! host = "192.168.1.40"
//! debug = false
//! debug_port = 8081
//! request_timeout_secs = 5
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so an empty file (or one
//! written for an older release) still loads.  Command-line flags override
//! whatever the file says; see `main.rs`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wall_core::protocol::paths;

use crate::domain::ControllerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub appliance: ApplianceSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Which appliance to talk to and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApplianceSection {
    #[serde(default = "default_host")]
    pub host: String,
    /// Mirror every command to `debug_port` on the same host.
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_host() -> String {
    ControllerConfig::default().host
}
fn default_debug_port() -> u16 {
    paths::DEBUG_MIRROR_PORT
}
fn default_request_timeout_secs() -> u64 {
    ControllerConfig::default().request_timeout.as_secs()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApplianceSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            debug: false,
            debug_port: default_debug_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl FileConfig {
    /// Controller settings described by the `[appliance]` section.
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            host: self.appliance.host.clone(),
            debug: self.appliance.debug,
            debug_port: self.appliance.debug_port,
            request_timeout: Duration::from_secs(self.appliance.request_timeout_secs),
            ..ControllerConfig::default()
        }
    }
}

/// Loads `path`, returning [`FileConfig::default()`] if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg: FileConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, FileConfig::default());
        assert_eq!(cfg.controller_config(), ControllerConfig::default());
    }

    #[test]
    fn test_partial_section_fills_missing_fields() {
        // Arrange
        let text = r#"
            [appliance]
            host = "10.0.0.20"
            debug = true
        "#;

        // Act
        let cfg: FileConfig = toml::from_str(text).unwrap();

        // Assert
        assert_eq!(cfg.appliance.host, "10.0.0.20");
        assert!(cfg.appliance.debug);
        assert_eq!(cfg.appliance.debug_port, 8081);
        assert_eq!(cfg.appliance.request_timeout_secs, 5);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_controller_config_carries_every_field() {
        let text = r#"
            [appliance]
            host = "wall.local:8080"
            debug_port = 9001
            request_timeout_secs = 12

            [logging]
            level = "debug"
        "#;
        let cfg: FileConfig = toml::from_str(text).unwrap();

        let controller = cfg.controller_config();

        assert_eq!(controller.host, "wall.local:8080");
        assert!(!controller.debug);
        assert_eq!(controller.debug_host(), "wall.local:8080:9001");
        assert_eq!(controller.request_timeout, Duration::from_secs(12));
        assert_eq!(controller.accept, "application/json");
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("wallctl-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[appliance\nhost = ").unwrap();

        let result = load_config(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("wallctl-does-not-exist/config.toml");
        assert_eq!(load_config(&path).unwrap(), FileConfig::default());
    }
}
