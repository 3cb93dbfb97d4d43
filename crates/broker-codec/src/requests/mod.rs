//! One request type per broker method.
//!
//! Every method takes its parameters as a positional JSON array. The position
//! of a value is its only identifier, so each request type serializes itself
//! as a fixed-length tuple and writes `null` for every absent value.

use broker_types::{BrokerError, Result};
use serde::Serialize;
use serde_json::Value;

pub mod cf_parameters;
pub mod deposit_address;
pub mod parameter_encoding;

pub const REQUEST_SWAP_DEPOSIT_ADDRESS: &str = "broker_request_swap_deposit_address";
pub const REQUEST_SWAP_PARAMETER_ENCODING: &str = "broker_request_swap_parameter_encoding";
pub const ENCODE_CF_PARAMETERS: &str = "broker_encode_cf_parameters";
/// Node variant of [`REQUEST_SWAP_PARAMETER_ENCODING`], taking the broker account first.
pub const NODE_REQUEST_SWAP_PARAMETER_ENCODING: &str = "cf_request_swap_parameter_encoding";
/// Node variant of [`ENCODE_CF_PARAMETERS`], taking the broker account first.
pub const NODE_ENCODE_CF_PARAMETERS: &str = "cf_encode_cf_parameters";

/// An assembled call to one broker method.
pub trait BrokerRequest: Serialize + Send + Sync {
	/// Decoded reply.
	type Response: Serialize + Send;

	/// JSON-RPC method name.
	fn method(&self) -> &'static str;

	/// The positional parameter array.
	fn params(&self) -> Result<Vec<Value>> {
		match serde_json::to_value(self) {
			Ok(Value::Array(params)) => Ok(params),
			Ok(other) => Err(BrokerError::invalid_parameter(
				"params",
				format!("expected a parameter array, got {}", other),
			)),
			Err(e) => Err(BrokerError::invalid_parameter("params", e.to_string())),
		}
	}

	/// Decodes the `result` member of the reply.
	fn decode_response(&self, result: Value) -> Result<Self::Response>;
}
