use broker_types::ChainflipNetwork;
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

fn default_log_level() -> String {
	DEFAULT_LOG_LEVEL.to_string()
}

fn default_timeout_seconds() -> u64 {
	DEFAULT_TIMEOUT_SECONDS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerConfig {
	pub broker: BrokerSettings,
	pub rpc: RpcConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerSettings {
	/// Network whose address formats are enforced.
	pub network: ChainflipNetwork,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

/// Connection to the broker or node RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
	pub url: String,
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
	/// Broker account to route through a node's `cf_` methods.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub broker_account: Option<String>,
}

impl RpcConfig {
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
			broker_account: None,
		}
	}

	/// The table handed to the transport factory.
	pub fn to_table(&self) -> toml::Value {
		let mut table = toml::Table::new();
		table.insert("url".to_string(), toml::Value::String(self.url.clone()));
		table.insert(
			"timeout_seconds".to_string(),
			toml::Value::Integer(i64::try_from(self.timeout_seconds).unwrap_or(i64::MAX)),
		);
		if let Some(account) = &self.broker_account {
			table.insert(
				"broker_account".to_string(),
				toml::Value::String(account.clone()),
			);
		}
		toml::Value::Table(table)
	}
}
