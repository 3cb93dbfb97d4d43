//! Big-integer hex codec used for every numeric value on the wire.
//!
//! Prices, amounts, fees, gas budgets and block numbers all travel as
//! `0x`-prefixed lowercase hex without leading zeros.

use alloy::primitives::U256;
use serde::{de, Deserialize, Deserializer, Serializer};
use std::fmt;
use thiserror::Error;

/// Errors raised while parsing a numeric string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HexError {
	/// A hex value without its `0x` prefix.
	#[error("missing 0x prefix")]
	MissingPrefix,
	/// Nothing to parse.
	#[error("no digits after 0x prefix")]
	Empty,
	/// A character outside `0-9a-fA-F`.
	#[error("invalid hex digit {0:?}")]
	InvalidDigit(char),
	/// The value needs more than 256 bits.
	#[error("value does not fit in 256 bits")]
	Overflow,
	/// A character outside `0-9` in a decimal string.
	#[error("invalid decimal digit {0:?}")]
	InvalidDecimal(char),
}

/// Encodes `value` as `0x` followed by lowercase hex digits.
pub fn to_hex(value: U256) -> String {
	format!("0x{:x}", value)
}

/// Decodes a `0x`/`0X` prefixed hex string of any digit count and case.
pub fn from_hex(input: &str) -> Result<U256, HexError> {
	let digits = input
		.strip_prefix("0x")
		.or_else(|| input.strip_prefix("0X"))
		.ok_or(HexError::MissingPrefix)?;
	if digits.is_empty() {
		return Err(HexError::Empty);
	}
	if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
		return Err(HexError::InvalidDigit(bad));
	}
	U256::from_str_radix(digits, 16).map_err(|_| HexError::Overflow)
}

/// Parses a string of decimal digits, or a hex string when it carries a `0x` prefix.
pub fn parse_unsigned(input: &str) -> Result<U256, HexError> {
	if input.starts_with("0x") || input.starts_with("0X") {
		return from_hex(input);
	}
	if input.is_empty() {
		return Err(HexError::Empty);
	}
	if let Some(bad) = input.chars().find(|c| !c.is_ascii_digit()) {
		return Err(HexError::InvalidDecimal(bad));
	}
	U256::from_str_radix(input, 10).map_err(|_| HexError::Overflow)
}

/// Whether `input` is `0x` followed by an even number of hex digits.
pub fn is_hex_bytes(input: &str) -> bool {
	input
		.strip_prefix("0x")
		.is_some_and(|digits| digits.len() % 2 == 0 && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Deserializes an integer that may arrive as a JSON number, a hex string or
/// a decimal string.
pub fn deserialize_number_or_hex<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
	D: Deserializer<'de>,
{
	deserializer.deserialize_any(NumberOrHexVisitor)
}

/// Deserializes a `0x` hex string into a [`U256`].
pub fn deserialize_hex<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;
	from_hex(&raw).map_err(|e| de::Error::custom(format!("{}: {:?}", e, raw)))
}

/// Serializes a [`U256`] the way it travels on the wire, as `0x` hex.
pub fn serialize_hex<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&to_hex(*value))
}

struct NumberOrHexVisitor;

impl<'de> de::Visitor<'de> for NumberOrHexVisitor {
	type Value = U256;

	fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		formatter.write_str("a non-negative integer or a hex string")
	}

	fn visit_u64<E: de::Error>(self, value: u64) -> Result<U256, E> {
		Ok(U256::from(value))
	}

	fn visit_i64<E: de::Error>(self, value: i64) -> Result<U256, E> {
		u64::try_from(value)
			.map(U256::from)
			.map_err(|_| E::custom(format!("negative integer {}", value)))
	}

	fn visit_u128<E: de::Error>(self, value: u128) -> Result<U256, E> {
		Ok(U256::from(value))
	}

	fn visit_str<E: de::Error>(self, value: &str) -> Result<U256, E> {
		parse_unsigned(value).map_err(|e| E::custom(format!("{}: {:?}", e, value)))
	}
}
