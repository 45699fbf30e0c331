//! Configuration management for Quill.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`; a missing file is not
//! an error.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Quill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Retry and timeout settings
    pub retry: RetryConfig,

    /// Generation request settings
    pub generation: GenerationConfig,

    /// Artifact output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Backend provider settings
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.quill.quill/config.toml
    /// - Linux: ~/.config/quill/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\quill\config\config.toml
    ///
    /// Falls back to ~/.quill/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "quill", "quill")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".quill").join("config.toml")
            })
    }

    /// Get the resolved artifact output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.output.dir);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.generation.max_output_tokens, 8000);
        assert_eq!(config.llm.provider, "anthropic");
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[retry]"));
        assert!(toml.contains("[generation]"));
        assert!(toml.contains("[output]"));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry]\nmax_retries = 5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.retry.max_retries, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.generation.max_output_tokens, 8000);
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "retry = not toml {").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_output_dir_expands_tilde() {
        let config = Config::default();
        let dir = config.output_dir();
        assert!(!dir.to_string_lossy().starts_with('~'));
    }
}
