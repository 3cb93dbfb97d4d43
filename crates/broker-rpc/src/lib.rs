//! Transport for broker JSON-RPC calls.
//!
//! The codec never performs I/O itself; requests are handed to an
//! [`RpcInterface`] implementation. The HTTP implementation speaks JSON-RPC
//! 2.0 over POST, and tests substitute their own.

use async_trait::async_trait;
use broker_types::{BrokerError, ConfigSchema};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

pub mod implementations {
	pub mod http;
}

/// Errors that can occur while sending a request.
#[derive(Debug, Error)]
pub enum TransportError {
	/// The request could not be delivered.
	#[error("Connection failed: {0}")]
	Connection(String),
	/// No reply within the configured timeout.
	#[error("Request timed out after {0:?}")]
	Timeout(Duration),
	/// A non-success HTTP status without a JSON-RPC error body.
	#[error("HTTP status {status}: {body}")]
	Http { status: u16, body: String },
	/// A reply that is not a JSON-RPC 2.0 response.
	#[error("Invalid reply: {0}")]
	InvalidReply(String),
	/// The node answered with a JSON-RPC error object.
	#[error("RPC error {code}: {message}")]
	Rpc { code: i64, message: String },
	/// The transport could not be built from its configuration.
	#[error("Invalid configuration: {0}")]
	Config(String),
}

impl From<TransportError> for BrokerError {
	fn from(error: TransportError) -> Self {
		match error {
			TransportError::Rpc { code, message } => BrokerError::RpcError { code, message },
			other => BrokerError::TransportError(other.to_string()),
		}
	}
}

/// A channel able to execute one JSON-RPC call.
#[async_trait]
pub trait RpcInterface: Send + Sync {
	/// Schema of the configuration table the transport is built from.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Checks a configuration table against [`RpcInterface::config_schema`].
	fn validate_config(&self, config: &toml::Value) -> Result<(), TransportError> {
		self.config_schema()
			.validate(config)
			.map_err(|e| TransportError::Config(e.to_string()))
	}

	/// Sends `method` with positional `params` and returns the `result` member.
	async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError>;
}

/// Sends requests through the configured transport.
pub struct RpcService {
	transport: Box<dyn RpcInterface>,
}

impl RpcService {
	pub fn new(transport: Box<dyn RpcInterface>) -> Self {
		Self { transport }
	}

	pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
		let started = Instant::now();
		let result = self.transport.call(method, params).await;
		debug!(
			method,
			elapsed_ms = started.elapsed().as_millis() as u64,
			ok = result.is_ok(),
			"RPC call finished"
		);
		result
	}
}
