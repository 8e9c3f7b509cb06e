//! Configuration module for the order console.
//!
//! This crate provides structures and utilities for managing console
//! configuration. It supports loading configuration from TOML files and
//! validates that all required values are properly set before the
//! engine starts.

#[cfg(feature = "testing")]
mod builder;

#[cfg(feature = "testing")]
pub use builder::ConfigBuilder;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the order console.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Backend job service connection settings.
	pub backend: BackendConfig,
	/// Table presentation defaults.
	#[serde(default)]
	pub table: TableConfig,
	/// Notification behavior.
	#[serde(default)]
	pub notification: NotificationConfig,
}

/// Backend job service connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
	/// Base URL of the job service, e.g. `http://127.0.0.1:5000/api`.
	pub base_url: String,
	/// Per-request timeout in seconds.
	#[serde(default = "default_http_timeout_seconds")]
	pub http_timeout_seconds: u64,
}

/// Returns the default per-request timeout in seconds.
fn default_http_timeout_seconds() -> u64 {
	30
}

/// Table presentation defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableConfig {
	/// Rows per page at session start.
	#[serde(default = "default_page_size")]
	pub page_size: usize,
	/// Page sizes offered by the pager.
	#[serde(default = "default_page_size_options")]
	pub page_size_options: Vec<usize>,
}

fn default_page_size() -> usize {
	10
}

fn default_page_size_options() -> Vec<usize> {
	vec![5, 10, 25, 50]
}

impl Default for TableConfig {
	fn default() -> Self {
		Self {
			page_size: default_page_size(),
			page_size_options: default_page_size_options(),
		}
	}
}

/// Notification behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
	/// Seconds before a visible notification dismisses itself.
	#[serde(default = "default_auto_dismiss_seconds")]
	pub auto_dismiss_seconds: u64,
}

fn default_auto_dismiss_seconds() -> u64 {
	6
}

impl Default for NotificationConfig {
	fn default() -> Self {
		Self {
			auto_dismiss_seconds: default_auto_dismiss_seconds(),
		}
	}
}

impl Config {
	/// Validates the configuration after parsing.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.backend.base_url.is_empty() {
			return Err(ConfigError::Validation(
				"backend.base_url must not be empty".to_string(),
			));
		}
		if self.backend.http_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"backend.http_timeout_seconds must be greater than zero".to_string(),
			));
		}
		if self.table.page_size == 0 {
			return Err(ConfigError::Validation(
				"table.page_size must be greater than zero".to_string(),
			));
		}
		if self.table.page_size_options.iter().any(|size| *size == 0) {
			return Err(ConfigError::Validation(
				"table.page_size_options must not contain zero".to_string(),
			));
		}
		Ok(())
	}

	/// Loads and validates configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		content.parse()
	}

	/// Loads and validates configuration from a TOML file without
	/// blocking the runtime.
	pub async fn from_file_async(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = tokio::fs::read_to_string(path.as_ref()).await?;
		content.parse()
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	const MINIMAL: &str = r#"
[backend]
base_url = "http://127.0.0.1:5000/api"
"#;

	#[test]
	fn test_minimal_config_gets_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.backend.http_timeout_seconds, 30);
		assert_eq!(config.table.page_size, 10);
		assert_eq!(config.table.page_size_options, vec![5, 10, 25, 50]);
		assert_eq!(config.notification.auto_dismiss_seconds, 6);
	}

	#[test]
	fn test_explicit_values_override_defaults() {
		let config: Config = r#"
[backend]
base_url = "http://backend:8080"
http_timeout_seconds = 5

[table]
page_size = 25
page_size_options = [25, 50]

[notification]
auto_dismiss_seconds = 10
"#
		.parse()
		.unwrap();
		assert_eq!(config.backend.http_timeout_seconds, 5);
		assert_eq!(config.table.page_size, 25);
		assert_eq!(config.notification.auto_dismiss_seconds, 10);
	}

	#[test]
	fn test_missing_backend_section_rejected() {
		assert!("".parse::<Config>().is_err());
	}

	#[test]
	fn test_zero_page_size_rejected() {
		let result = r#"
[backend]
base_url = "http://127.0.0.1:5000/api"

[table]
page_size = 0
"#
		.parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[tokio::test]
	async fn test_from_file_async() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("config.toml");
		fs::write(&config_path, MINIMAL).unwrap();

		let config = Config::from_file_async(&config_path).await.unwrap();
		assert_eq!(config.backend.base_url, "http://127.0.0.1:5000/api");
	}
}
