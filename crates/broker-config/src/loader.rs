//! Configuration loading from files and environment.

use crate::types::*;
use crate::ConfigError;
use broker_types::ChainflipNetwork;
use std::path::Path;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "BROKER_CONFIG";
pub const NETWORK_ENV: &str = "BROKER_NETWORK";
pub const RPC_URL_ENV: &str = "BROKER_RPC_URL";
pub const RPC_TIMEOUT_ENV: &str = "BROKER_RPC_TIMEOUT";
pub const ACCOUNT_ENV: &str = "BROKER_ACCOUNT";

const SEARCH_PATHS: [&str; 2] = ["./broker.toml", "./config/broker.toml"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_TIMEOUT_SECONDS: u64 = 300;

fn parse_error(format: &'static str, error: impl ToString) -> ConfigError {
	ConfigError::Parse {
		format,
		message: error.to_string(),
	}
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
	/// Load configuration from a `.toml`, `.json`, `.yaml` or `.yml` file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BrokerConfig, ConfigError> {
		let path = path.as_ref();
		info!("Loading configuration from {:?}", path);

		let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;

		let config = match path.extension().and_then(|s| s.to_str()) {
			Some("toml") => Self::from_toml(&contents)?,
			Some("json") => Self::from_json(&contents)?,
			Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
			_ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
		};

		Self::validate_config(&config)?;
		Ok(config)
	}

	pub fn from_toml(contents: &str) -> Result<BrokerConfig, ConfigError> {
		toml::from_str(contents).map_err(|e| parse_error("TOML", e))
	}

	pub fn from_json(contents: &str) -> Result<BrokerConfig, ConfigError> {
		serde_json::from_str(contents).map_err(|e| parse_error("JSON", e))
	}

	pub fn from_yaml(contents: &str) -> Result<BrokerConfig, ConfigError> {
		serde_yaml::from_str(contents).map_err(|e| parse_error("YAML", e))
	}

	/// Load from an optional file, then apply environment overrides.
	///
	/// Without a file, `BROKER_NETWORK` and `BROKER_RPC_URL` must both be set.
	pub fn from_env_and_file(file_path: Option<&Path>) -> Result<BrokerConfig, ConfigError> {
		Self::from_lookup_and_file(file_path, |key| std::env::var(key).ok())
	}

	fn from_lookup_and_file<F>(file_path: Option<&Path>, lookup: F) -> Result<BrokerConfig, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = match file_path {
			Some(path) => Self::from_file(path)?,
			None => Self::from_lookup(&lookup)?,
		};

		Self::apply_overrides(&mut config, &lookup)?;
		Self::validate_config(&config)?;
		Ok(config)
	}

	fn from_lookup<F>(lookup: &F) -> Result<BrokerConfig, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let (Some(network), Some(url)) = (lookup(NETWORK_ENV), lookup(RPC_URL_ENV)) else {
			return Err(ConfigError::NotFound);
		};
		debug!("Building configuration from environment");

		Ok(BrokerConfig {
			broker: BrokerSettings {
				network: parse_network(&network)?,
				log_level: DEFAULT_LOG_LEVEL.to_string(),
			},
			rpc: RpcConfig::new(url),
		})
	}

	/// Apply environment variable overrides
	fn apply_overrides<F>(config: &mut BrokerConfig, lookup: &F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(network) = lookup(NETWORK_ENV) {
			debug!("Overriding network from environment");
			config.broker.network = parse_network(&network)?;
		}

		if let Some(url) = lookup(RPC_URL_ENV) {
			debug!("Overriding RPC URL from environment");
			config.rpc.url = url;
		}

		if let Some(timeout) = lookup(RPC_TIMEOUT_ENV) {
			debug!("Overriding RPC timeout from environment");
			config.rpc.timeout_seconds = timeout.trim().parse().map_err(|_| {
				ConfigError::Validation(format!("{} must be a number of seconds", RPC_TIMEOUT_ENV))
			})?;
		}

		if let Some(account) = lookup(ACCOUNT_ENV) {
			debug!("Overriding broker account from environment");
			config.rpc.broker_account = Some(account).filter(|account| !account.is_empty());
		}

		Ok(())
	}

	fn validate_config(config: &BrokerConfig) -> Result<(), ConfigError> {
		let url = &config.rpc.url;
		if !(url.starts_with("http://") || url.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"rpc.url must be an http(s) URL, got {:?}",
				url
			)));
		}

		if !(1..=MAX_TIMEOUT_SECONDS).contains(&config.rpc.timeout_seconds) {
			return Err(ConfigError::Validation(format!(
				"rpc.timeout_seconds must be between 1 and {}",
				MAX_TIMEOUT_SECONDS
			)));
		}

		if !LOG_LEVELS
			.iter()
			.any(|level| level.eq_ignore_ascii_case(&config.broker.log_level))
		{
			return Err(ConfigError::Validation(format!(
				"broker.log_level must be one of {}",
				LOG_LEVELS.join(", ")
			)));
		}

		Ok(())
	}
}

fn parse_network(value: &str) -> Result<ChainflipNetwork, ConfigError> {
	value
		.parse()
		.map_err(|e: broker_types::BrokerError| ConfigError::Validation(e.to_string()))
}

/// Load configuration from standard locations
pub fn load_config() -> Result<BrokerConfig, ConfigError> {
	// Check for config file in order:
	// 1. Environment variable BROKER_CONFIG
	// 2. ./broker.toml
	// 3. ./config/broker.toml
	// 4. Environment variables only

	if let Ok(path) = std::env::var(CONFIG_ENV) {
		return ConfigLoader::from_env_and_file(Some(Path::new(&path)));
	}

	for path in &SEARCH_PATHS {
		if Path::new(path).exists() {
			return ConfigLoader::from_env_and_file(Some(Path::new(path)));
		}
	}

	ConfigLoader::from_env_and_file(None)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	const TOML: &str = r#"
[broker]
network = "perseverance"

[rpc]
url = "http://localhost:10997"
"#;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| vars.get(key).cloned()
	}

	fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
		file.write_all(contents.as_bytes()).unwrap();
		file
	}

	#[test]
	fn test_toml_defaults() {
		let config = ConfigLoader::from_toml(TOML).unwrap();
		assert_eq!(config.broker.network, ChainflipNetwork::Perseverance);
		assert_eq!(config.broker.log_level, "info");
		assert_eq!(config.rpc.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
		assert_eq!(config.rpc.broker_account, None);
	}

	#[test]
	fn test_json_and_yaml() {
		let json = r#"{
			"broker": { "network": "mainnet", "log_level": "debug" },
			"rpc": { "url": "https://rpc.example.org", "timeout_seconds": 5 }
		}"#;
		let config = ConfigLoader::from_json(json).unwrap();
		assert_eq!(config.broker.network, ChainflipNetwork::Mainnet);
		assert_eq!(config.rpc.timeout_seconds, 5);

		let yaml = "broker:\n  network: backspin\nrpc:\n  url: http://localhost:9944\n  broker_account: cFHyJEHEQ1YkT9xuFnxnPWVkihpYEGjBg4WbF6vCPtSPQoE8n\n";
		let config = ConfigLoader::from_yaml(yaml).unwrap();
		assert_eq!(config.broker.network, ChainflipNetwork::Backspin);
		assert!(config.rpc.broker_account.is_some());
	}

	#[test]
	fn test_from_file_by_extension() {
		let file = write_config(".toml", TOML);
		let config = ConfigLoader::from_file(file.path()).unwrap();
		assert_eq!(config.rpc.url, "http://localhost:10997");

		let file = write_config(".ini", TOML);
		assert!(matches!(
			ConfigLoader::from_file(file.path()),
			Err(ConfigError::UnsupportedFormat(_))
		));

		assert!(matches!(
			ConfigLoader::from_file("/nonexistent/broker.toml"),
			Err(ConfigError::Io { .. })
		));
	}

	#[test]
	fn test_invalid_values() {
		let unknown_network = TOML.replace("perseverance", "devnet");
		assert!(matches!(
			ConfigLoader::from_toml(&unknown_network),
			Err(ConfigError::Parse { format: "TOML", .. })
		));

		let file = write_config(".toml", &format!("{}timeout_seconds = 0\n", TOML));
		assert!(matches!(
			ConfigLoader::from_file(file.path()),
			Err(ConfigError::Validation(_))
		));

		let file = write_config(".toml", &TOML.replace("http://", "ws://"));
		assert!(matches!(
			ConfigLoader::from_file(file.path()),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_environment_overrides() {
		let file = write_config(".toml", TOML);
		let config = ConfigLoader::from_lookup_and_file(
			Some(file.path()),
			lookup(&[
				(NETWORK_ENV, "Mainnet"),
				(RPC_TIMEOUT_ENV, "12"),
				(ACCOUNT_ENV, "cFHyJEHEQ1YkT9xuFnxnPWVkihpYEGjBg4WbF6vCPtSPQoE8n"),
			]),
		)
		.unwrap();

		assert_eq!(config.broker.network, ChainflipNetwork::Mainnet);
		assert_eq!(config.rpc.url, "http://localhost:10997");
		assert_eq!(config.rpc.timeout_seconds, 12);
		assert_eq!(
			config.rpc.broker_account.as_deref(),
			Some("cFHyJEHEQ1YkT9xuFnxnPWVkihpYEGjBg4WbF6vCPtSPQoE8n")
		);

		let bad_timeout =
			ConfigLoader::from_lookup_and_file(Some(file.path()), lookup(&[(RPC_TIMEOUT_ENV, "soon")]));
		assert!(matches!(bad_timeout, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_environment_only() {
		let config = ConfigLoader::from_lookup_and_file(
			None,
			lookup(&[(NETWORK_ENV, "localnet"), (RPC_URL_ENV, "http://127.0.0.1:10997")]),
		)
		.unwrap();
		assert_eq!(config.broker.network, ChainflipNetwork::Localnet);
		assert_eq!(config.rpc, RpcConfig::new("http://127.0.0.1:10997"));

		assert!(matches!(
			ConfigLoader::from_lookup_and_file(None, lookup(&[(NETWORK_ENV, "localnet")])),
			Err(ConfigError::NotFound)
		));
	}

	#[test]
	fn test_rpc_table() {
		let mut rpc = RpcConfig::new("http://localhost:10997");
		rpc.broker_account = Some("cFHyJEHEQ1YkT9xuFnxnPWVkihpYEGjBg4WbF6vCPtSPQoE8n".to_string());
		let table = rpc.to_table();

		assert_eq!(table.get("url").and_then(|v| v.as_str()), Some("http://localhost:10997"));
		assert_eq!(table.get("timeout_seconds").and_then(|v| v.as_integer()), Some(30));
		assert!(table.get("broker_account").is_some());
	}
}
