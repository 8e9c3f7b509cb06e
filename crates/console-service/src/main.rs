//! Main entry point for the order console service.
//!
//! This binary wires the engine together: it loads configuration,
//! builds the HTTP client for the backend job service, fetches the
//! task catalog and runs the engine loop until interrupted. A
//! presentation layer attaches through the action channel and the
//! engine's event bus.

use clap::Parser;
use console_client::{BackendService, HttpJobService};
use console_config::Config;
use console_core::{ConsoleAction, ConsoleEngine};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Command-line arguments for the console service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the console service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the backend client and fetches the task catalog
/// 5. Runs the engine until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started order console");

	// Load configuration
	let config = Config::from_file_async(&args.config).await?;
	tracing::info!(backend = %config.backend.base_url, "Loaded configuration");

	let backend = Arc::new(BackendService::new(Box::new(HttpJobService::new(
		config.backend.base_url.clone(),
		Duration::from_secs(config.backend.http_timeout_seconds),
	)?)));

	// The catalog is injected at startup; a backend outage degrades to
	// an empty catalog, the rest of the console still works.
	let catalog = match backend.fetch_catalog().await {
		Ok(catalog) => {
			tracing::info!(items = catalog.len(), "Loaded task catalog");
			catalog
		}
		Err(error) => {
			tracing::warn!(%error, "Could not load task catalog, starting empty");
			Vec::new()
		}
	};

	let engine = ConsoleEngine::new(config, backend, catalog);

	// The action sender is the attachment point for a presentation
	// layer; it must stay alive for as long as the engine runs.
	let (actions, actions_rx) = mpsc::unbounded_channel::<ConsoleAction>();
	let _actions = actions;

	engine.run(actions_rx).await?;

	tracing::info!("Stopped order console");
	Ok(())
}
