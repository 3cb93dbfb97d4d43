//! Configuration for the broker client and command line tool.

pub mod loader;
pub mod types;

pub use loader::{load_config, ConfigLoader};
pub use types::*;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Failed to read config file {path:?}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Failed to parse {format}: {message}")]
	Parse {
		format: &'static str,
		message: String,
	},
	#[error("Unsupported config format: {0:?}")]
	UnsupportedFormat(PathBuf),
	#[error("Invalid configuration: {0}")]
	Validation(String),
	#[error("No configuration found: set BROKER_CONFIG, create ./broker.toml or set BROKER_NETWORK and BROKER_RPC_URL")]
	NotFound,
}
