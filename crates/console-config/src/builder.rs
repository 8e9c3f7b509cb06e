//! Configuration builder for creating test configurations.
//!
//! Provides a fluent API for constructing [`Config`] instances with
//! sensible defaults, so tests do not have to go through TOML text.

use crate::{BackendConfig, Config, NotificationConfig, TableConfig};

/// Builder for creating `Config` instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	base_url: String,
	http_timeout_seconds: u64,
	page_size: usize,
	auto_dismiss_seconds: u64,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with defaults suitable for testing.
	pub fn new() -> Self {
		Self {
			base_url: "http://127.0.0.1:5000/api".to_string(),
			http_timeout_seconds: 1,
			page_size: 10,
			auto_dismiss_seconds: 6,
		}
	}

	/// Sets the backend base URL.
	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	/// Sets the per-request timeout in seconds.
	pub fn http_timeout_seconds(mut self, seconds: u64) -> Self {
		self.http_timeout_seconds = seconds;
		self
	}

	/// Sets the initial page size.
	pub fn page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	/// Sets the notification auto-dismiss delay in seconds.
	pub fn auto_dismiss_seconds(mut self, seconds: u64) -> Self {
		self.auto_dismiss_seconds = seconds;
		self
	}

	/// Builds the configuration.
	pub fn build(self) -> Config {
		Config {
			backend: BackendConfig {
				base_url: self.base_url,
				http_timeout_seconds: self.http_timeout_seconds,
			},
			table: TableConfig {
				page_size: self.page_size,
				..TableConfig::default()
			},
			notification: NotificationConfig {
				auto_dismiss_seconds: self.auto_dismiss_seconds,
			},
		}
	}
}
