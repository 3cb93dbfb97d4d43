//! Cross-chain message metadata.

use broker_types::numeric::is_hex_bytes;
use broker_types::{parse_unsigned, to_hex, BrokerError, CcmParams, Result};
use serde::Serialize;

/// Largest CCM message the protocol accepts, in bytes.
pub const MAX_CCM_MESSAGE_BYTES: usize = 15_000;
/// Largest CCM additional data the protocol accepts, in bytes.
pub const MAX_CCM_ADDITIONAL_DATA_BYTES: usize = 3_000;

const EMPTY_BYTES: &str = "0x";

/// Wire form of [`CcmParams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CcmChannelMetadata {
	pub gas_budget: String,
	pub message: String,
	pub ccm_additional_data: String,
}

fn check_bytes(field: &str, value: &str, max_bytes: usize) -> Result<()> {
	if !is_hex_bytes(value) {
		return Err(BrokerError::invalid_parameter(
			field,
			"expected 0x-prefixed hex bytes",
		));
	}
	let len = (value.len() - 2) / 2;
	if len > max_bytes {
		return Err(BrokerError::invalid_parameter(
			field,
			format!("{} bytes exceeds the limit of {}", len, max_bytes),
		));
	}
	Ok(())
}

/// Encodes CCM parameters. `field` prefixes error messages, e.g. `ccmParams`.
pub fn encode_ccm_params(params: &CcmParams, field: &str) -> Result<CcmChannelMetadata> {
	let gas_budget = parse_unsigned(&params.gas_budget).map_err(|e| {
		BrokerError::invalid_parameter(format!("{}.gasBudget", field), e.to_string())
	})?;

	check_bytes(
		&format!("{}.message", field),
		&params.message,
		MAX_CCM_MESSAGE_BYTES,
	)?;

	let ccm_additional_data = match &params.ccm_additional_data {
		Some(data) => {
			check_bytes(
				&format!("{}.ccmAdditionalData", field),
				data,
				MAX_CCM_ADDITIONAL_DATA_BYTES,
			)?;
			data.clone()
		}
		None => EMPTY_BYTES.to_string(),
	};

	Ok(CcmChannelMetadata {
		gas_budget: to_hex(gas_budget),
		message: params.message.clone(),
		ccm_additional_data,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_gas_budget_is_hex_encoded() {
		let encoded = encode_ccm_params(&CcmParams::new("123456789", "0xdeadc0de"), "ccmParams")
			.unwrap();
		assert_eq!(
			serde_json::to_value(encoded).unwrap(),
			json!({
				"gas_budget": "0x75bcd15",
				"message": "0xdeadc0de",
				"ccm_additional_data": "0x"
			})
		);
	}

	#[test]
	fn test_hex_gas_budget_and_additional_data_pass_through() {
		let params = CcmParams::new("0x75BCD15", "0x").with_additional_data("0xcafebabe");
		let encoded = encode_ccm_params(&params, "ccmParams").unwrap();
		assert_eq!(encoded.gas_budget, "0x75bcd15");
		assert_eq!(encoded.ccm_additional_data, "0xcafebabe");
	}

	#[test]
	fn test_rejects_invalid_fields() {
		let bad_budget = encode_ccm_params(&CcmParams::new("12.5", "0x00"), "ccmParams");
		assert!(matches!(
			bad_budget,
			Err(BrokerError::InvalidParameter { ref field, .. }) if field == "ccmParams.gasBudget"
		));

		let bad_message = encode_ccm_params(&CcmParams::new("1", "hello"), "ccmParams");
		assert!(matches!(
			bad_message,
			Err(BrokerError::InvalidParameter { ref field, .. }) if field == "ccmParams.message"
		));

		let odd = encode_ccm_params(&CcmParams::new("1", "0xabc"), "refundCcmMetadata");
		assert!(matches!(
			odd,
			Err(BrokerError::InvalidParameter { ref field, .. }) if field == "refundCcmMetadata.message"
		));
	}

	#[test]
	fn test_size_limits() {
		let at_limit = format!("0x{}", "00".repeat(MAX_CCM_MESSAGE_BYTES));
		assert!(encode_ccm_params(&CcmParams::new("1", at_limit), "ccmParams").is_ok());

		let too_long = format!("0x{}", "00".repeat(MAX_CCM_MESSAGE_BYTES + 1));
		assert!(encode_ccm_params(&CcmParams::new("1", too_long), "ccmParams").is_err());

		let data = format!("0x{}", "ff".repeat(MAX_CCM_ADDITIONAL_DATA_BYTES + 1));
		let params = CcmParams::new("1", "0x").with_additional_data(data);
		assert!(matches!(
			encode_ccm_params(&params, "ccmParams"),
			Err(BrokerError::InvalidParameter { ref field, .. }) if field == "ccmParams.ccmAdditionalData"
		));
	}
}
