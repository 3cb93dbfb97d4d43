//! JSON-RPC 2.0 over HTTP.

use crate::{RpcInterface, TransportError};
use async_trait::async_trait;
use broker_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
	jsonrpc: &'static str,
	id: u64,
	method: &'a str,
	params: Vec<Value>,
}

#[derive(Deserialize)]
struct JsonRpcReply {
	#[serde(default)]
	result: Option<Value>,
	#[serde(default)]
	error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
	code: i64,
	message: String,
}

/// Extracts the result of a reply. A batch holding exactly one reply is unwrapped.
fn parse_reply(body: Value) -> Result<Value, TransportError> {
	let body = match body {
		Value::Array(mut replies) if replies.len() == 1 => replies.remove(0),
		Value::Array(replies) => {
			return Err(TransportError::InvalidReply(format!(
				"expected a single reply, got a batch of {}",
				replies.len()
			)))
		}
		other => other,
	};

	let reply: JsonRpcReply =
		serde_json::from_value(body).map_err(|e| TransportError::InvalidReply(e.to_string()))?;
	match (reply.error, reply.result) {
		(Some(error), _) => Err(TransportError::Rpc {
			code: error.code,
			message: error.message,
		}),
		(None, Some(result)) => Ok(result),
		(None, None) => Err(TransportError::InvalidReply(
			"reply carries neither a result nor an error".to_string(),
		)),
	}
}

pub struct HttpTransport {
	client: reqwest::Client,
	url: String,
	timeout: Duration,
	next_id: AtomicU64,
}

impl HttpTransport {
	pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| TransportError::Config(format!("Failed to create HTTP client: {}", e)))?;

		Ok(Self {
			client,
			url: url.into(),
			timeout,
			next_id: AtomicU64::new(0),
		})
	}

	pub fn url(&self) -> &str {
		&self.url
	}
}

/// Configuration schema for [`HttpTransport`].
pub struct HttpTransportSchema;

impl ConfigSchema for HttpTransportSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![Field::new("url", FieldType::Url)],
			vec![
				Field::new(
					"timeout_seconds",
					FieldType::Integer {
						min: Some(1),
						max: Some(300),
					},
				),
				Field::new("broker_account", FieldType::String),
			],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl RpcInterface for HttpTransport {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(HttpTransportSchema)
	}

	async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let request = JsonRpcRequest {
			jsonrpc: "2.0",
			id,
			method,
			params,
		};
		debug!(method, id, url = %self.url, "Sending JSON-RPC request");

		let response = self
			.client
			.post(&self.url)
			.json(&request)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() {
					TransportError::Timeout(self.timeout)
				} else {
					TransportError::Connection(e.to_string())
				}
			})?;

		let status = response.status();
		let text = response.text().await.map_err(|e| {
			if e.is_timeout() {
				TransportError::Timeout(self.timeout)
			} else {
				TransportError::Connection(e.to_string())
			}
		})?;

		if !status.is_success() {
			warn!(method, status = status.as_u16(), "JSON-RPC request failed");
			// Nodes report some errors as a JSON-RPC error with a failure status.
			if let Ok(Err(rpc @ TransportError::Rpc { .. })) =
				serde_json::from_str::<Value>(&text).map(parse_reply)
			{
				return Err(rpc);
			}
			return Err(TransportError::Http {
				status: status.as_u16(),
				body: text,
			});
		}

		let body: Value = serde_json::from_str(&text)
			.map_err(|e| TransportError::InvalidReply(format!("Failed to parse JSON reply: {}", e)))?;
		parse_reply(body)
	}
}

/// Builds an [`HttpTransport`] from its TOML table.
pub fn create_http_transport(config: &toml::Value) -> Result<Box<dyn RpcInterface>, TransportError> {
	let url = config
		.get("url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| TransportError::Config("url is required".to_string()))?;
	let timeout = config
		.get("timeout_seconds")
		.and_then(|v| v.as_integer())
		.and_then(|seconds| u64::try_from(seconds).ok())
		.unwrap_or(DEFAULT_TIMEOUT_SECONDS);

	let transport = HttpTransport::new(url, Duration::from_secs(timeout))?;
	transport.validate_config(config)?;
	Ok(Box::new(transport))
}
