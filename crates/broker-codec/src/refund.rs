//! Refund (fill-or-kill) parameters.

use crate::ccm::{encode_ccm_params, CcmChannelMetadata};
use crate::fields::check_bps;
use broker_address::wire_address;
use broker_types::{to_fixed_point_price, to_hex, FillOrKillParams, InternalAsset, Result};
use serde::Serialize;

/// Wire form of [`FillOrKillParams`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefundParameters {
	pub retry_duration: u32,
	pub refund_address: String,
	pub refund_ccm_metadata: Option<CcmChannelMetadata>,
	/// Hex encoded 128.128 fixed-point price in base units.
	pub min_price: String,
	pub max_oracle_price_slippage: Option<u16>,
}

/// Encodes the refund policy of a swap from `src_asset` to `dest_asset`.
///
/// Returns `None` when no policy was supplied. The minimum price is always
/// derived from the decimal `minPrice` of the caller. The refund address is
/// expected to be validated already; Polkadot-family addresses are rewritten to
/// their hex account id.
pub fn encode_refund_params(
	params: Option<&FillOrKillParams>,
	src_asset: InternalAsset,
	dest_asset: InternalAsset,
) -> Result<Option<RefundParameters>> {
	let Some(params) = params else {
		return Ok(None);
	};

	if let Some(slippage) = params.max_oracle_price_slippage {
		check_bps("fillOrKillParams.maxOraclePriceSlippage", slippage)?;
	}

	let refund_ccm_metadata = params
		.refund_ccm_metadata
		.as_ref()
		.map(|ccm| encode_ccm_params(ccm, "fillOrKillParams.refundCcmMetadata"))
		.transpose()?;

	let min_price = to_fixed_point_price(&params.min_price, src_asset, dest_asset)?;

	Ok(Some(RefundParameters {
		retry_duration: params.retry_duration_blocks,
		refund_address: wire_address(src_asset.chain(), &params.refund_address),
		refund_ccm_metadata,
		min_price: to_hex(min_price),
		max_oracle_price_slippage: params.max_oracle_price_slippage,
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use broker_types::{BrokerError, CcmParams};
	use serde_json::json;

	const REFUND_ADDRESS: &str = "bc1qqwykx04uenc842d3sf50cjtehtj9tenugk808w";

	#[test]
	fn test_absent_policy_is_none() {
		assert_eq!(
			encode_refund_params(None, InternalAsset::Btc, InternalAsset::Eth),
			Ok(None)
		);
	}

	#[test]
	fn test_encodes_policy() {
		let params = FillOrKillParams::new(500, REFUND_ADDRESS, "10000000000000");
		let encoded = encode_refund_params(Some(&params), InternalAsset::Btc, InternalAsset::Flip)
			.unwrap()
			.unwrap();

		assert_eq!(
			serde_json::to_value(encoded).unwrap(),
			json!({
				"retry_duration": 500,
				"refund_address": REFUND_ADDRESS,
				"refund_ccm_metadata": null,
				"min_price": "0x152d02c7e14af680000000000000000000000000000000000000",
				"max_oracle_price_slippage": null
			})
		);
	}

	#[test]
	fn test_encodes_slippage_and_refund_ccm() {
		let params = FillOrKillParams::new(10, REFUND_ADDRESS, "1")
			.with_max_oracle_price_slippage(50)
			.with_refund_ccm_metadata(CcmParams::new("1000", "0x01"));
		let encoded = encode_refund_params(Some(&params), InternalAsset::Btc, InternalAsset::Wbtc)
			.unwrap()
			.unwrap();

		assert_eq!(encoded.max_oracle_price_slippage, Some(50));
		assert_eq!(encoded.min_price, format!("0x1{}", "0".repeat(32)));
		let ccm = encoded.refund_ccm_metadata.unwrap();
		assert_eq!(ccm.gas_budget, "0x3e8");
		assert_eq!(ccm.ccm_additional_data, "0x");
	}

	#[test]
	fn test_polkadot_refund_address_sent_as_account_id() {
		let params = FillOrKillParams::new(10, "1exaAg2VJRQbyUBAeXcktChCAqjVP9TUxF3zo23R2T6EGdE", "1");
		let encoded = encode_refund_params(Some(&params), InternalAsset::Dot, InternalAsset::Usdc)
			.unwrap()
			.unwrap();

		assert_eq!(
			encoded.refund_address,
			"0x1cf326c5aaa5af9f0e2791e66310fe8f044faadaf12567eaa0976959d1f7731f"
		);
	}

	#[test]
	fn test_rejects_bad_price_and_slippage() {
		let negative = FillOrKillParams::new(10, REFUND_ADDRESS, "-1");
		assert!(matches!(
			encode_refund_params(Some(&negative), InternalAsset::Btc, InternalAsset::Eth),
			Err(BrokerError::InvalidPrice { .. })
		));

		let slippage = FillOrKillParams::new(10, REFUND_ADDRESS, "1")
			.with_max_oracle_price_slippage(10_001);
		assert!(matches!(
			encode_refund_params(Some(&slippage), InternalAsset::Btc, InternalAsset::Eth),
			Err(BrokerError::InvalidParameter { .. })
		));
	}
}
