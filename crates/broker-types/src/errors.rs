//! Error types for the broker codec.

use crate::chains::{Asset, Chain};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrokerError>;

/// Which field of a request an address was supplied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressRole {
	Destination,
	Source,
	Refund,
	Affiliate,
	BrokerAccount,
}

impl fmt::Display for AddressRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let role = match self {
			AddressRole::Destination => "destination",
			AddressRole::Source => "source",
			AddressRole::Refund => "refund",
			AddressRole::Affiliate => "affiliate",
			AddressRole::BrokerAccount => "broker account",
		};
		f.write_str(role)
	}
}

/// Everything that can go wrong while encoding, sending or decoding a request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
	/// An address failed its chain grammar or network check.
	///
	/// `chain` names the address family, which is `Chainflip` for state-chain accounts.
	#[error("Invalid {role} address {address:?} for {chain}: {reason}")]
	InvalidAddress {
		chain: String,
		role: AddressRole,
		address: String,
		reason: String,
	},

	/// A price that is not a non-negative decimal or does not fit in 256 bits.
	#[error("Invalid price {input:?}: {reason}")]
	InvalidPrice { input: String, reason: String },

	/// A source and destination pairing the protocol does not accept.
	#[error("Unsupported route {src_chain} -> {dest_chain}: {reason}")]
	UnsupportedRoute {
		src_chain: Chain,
		dest_chain: Chain,
		reason: String,
	},

	/// A chain and asset pair outside the registry.
	#[error("Asset {asset} is not supported on {chain}")]
	UnsupportedAsset { chain: Chain, asset: Asset },

	/// DCA parameters that cannot be executed.
	#[error("Invalid DCA parameters: {0}")]
	InvalidDcaParams(String),

	/// A field the requested method needs was not supplied.
	#[error("Missing required field: {0}")]
	MissingRequiredField(String),

	/// A field that is present but out of range or badly formatted.
	#[error("Invalid value for {field}: {message}")]
	InvalidParameter { field: String, message: String },

	/// A reply that does not match the expected shape.
	#[error("Malformed response: {0}")]
	MalformedResponse(String),

	/// A JSON-RPC error object returned by the broker or node.
	#[error("RPC error {code}: {message}")]
	RpcError { code: i64, message: String },

	/// The transport failed before a reply was received.
	#[error("Transport error: {0}")]
	TransportError(String),
}

impl BrokerError {
	pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
		BrokerError::InvalidParameter {
			field: field.into(),
			message: message.into(),
		}
	}
}
