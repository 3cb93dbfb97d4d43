//! The swap intent a caller hands to the codec.
//!
//! Field names follow the camelCase JSON accepted by the command line tool.
//! Nothing here is validated on construction; the request assemblers check
//! every field before anything is encoded.

use crate::chains::InternalAsset;
use serde::{Deserialize, Serialize};

/// Cross-chain message attached to a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CcmParams {
	/// Decimal digits or `0x` hex.
	pub gas_budget: String,
	/// `0x` hex payload.
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ccm_additional_data: Option<String>,
}

impl CcmParams {
	pub fn new(gas_budget: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			gas_budget: gas_budget.into(),
			message: message.into(),
			ccm_additional_data: None,
		}
	}

	pub fn with_additional_data(mut self, data: impl Into<String>) -> Self {
		self.ccm_additional_data = Some(data.into());
		self
	}
}

/// Splits a swap into equal chunks executed `chunk_interval_blocks` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcaParams {
	pub number_of_chunks: u32,
	pub chunk_interval_blocks: u32,
}

/// Refund policy applied when a swap cannot execute at `min_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillOrKillParams {
	pub retry_duration_blocks: u32,
	pub refund_address: String,
	/// Human price: whole destination tokens per whole source token.
	pub min_price: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_oracle_price_slippage: Option<u16>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refund_ccm_metadata: Option<CcmParams>,
}

impl FillOrKillParams {
	pub fn new(
		retry_duration_blocks: u32,
		refund_address: impl Into<String>,
		min_price: impl Into<String>,
	) -> Self {
		Self {
			retry_duration_blocks,
			refund_address: refund_address.into(),
			min_price: min_price.into(),
			max_oracle_price_slippage: None,
			refund_ccm_metadata: None,
		}
	}

	pub fn with_max_oracle_price_slippage(mut self, bps: u16) -> Self {
		self.max_oracle_price_slippage = Some(bps);
		self
	}

	pub fn with_refund_ccm_metadata(mut self, ccm: CcmParams) -> Self {
		self.refund_ccm_metadata = Some(ccm);
		self
	}
}

/// Secondary fee recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateBroker {
	pub account: String,
	pub commission_bps: u16,
}

/// Chain specific extras for parameter encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraParams {
	/// 32-byte `0x` hex seed for the Solana swap account.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub seed: Option<String>,
}

/// A single swap request as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapIntent {
	pub src_asset: InternalAsset,
	pub dest_asset: InternalAsset,
	pub dest_address: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub src_address: Option<String>,
	/// Raw base units of the source asset, as decimal digits.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amount: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub commission_bps: Option<u16>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub affiliates: Option<Vec<AffiliateBroker>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_boost_fee_bps: Option<u16>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ccm_params: Option<CcmParams>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dca_params: Option<DcaParams>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fill_or_kill_params: Option<FillOrKillParams>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extra_params: Option<ExtraParams>,
}

impl SwapIntent {
	pub fn new(
		src_asset: InternalAsset,
		dest_asset: InternalAsset,
		dest_address: impl Into<String>,
	) -> Self {
		Self {
			src_asset,
			dest_asset,
			dest_address: dest_address.into(),
			src_address: None,
			amount: None,
			commission_bps: None,
			affiliates: None,
			max_boost_fee_bps: None,
			ccm_params: None,
			dca_params: None,
			fill_or_kill_params: None,
			extra_params: None,
		}
	}

	pub fn with_src_address(mut self, address: impl Into<String>) -> Self {
		self.src_address = Some(address.into());
		self
	}

	pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
		self.amount = Some(amount.into());
		self
	}

	pub fn with_commission_bps(mut self, bps: u16) -> Self {
		self.commission_bps = Some(bps);
		self
	}

	pub fn with_affiliate(mut self, account: impl Into<String>, commission_bps: u16) -> Self {
		self.affiliates
			.get_or_insert_with(Vec::new)
			.push(AffiliateBroker {
				account: account.into(),
				commission_bps,
			});
		self
	}

	pub fn with_max_boost_fee_bps(mut self, bps: u16) -> Self {
		self.max_boost_fee_bps = Some(bps);
		self
	}

	pub fn with_ccm_params(mut self, ccm: CcmParams) -> Self {
		self.ccm_params = Some(ccm);
		self
	}

	pub fn with_dca_params(mut self, number_of_chunks: u32, chunk_interval_blocks: u32) -> Self {
		self.dca_params = Some(DcaParams {
			number_of_chunks,
			chunk_interval_blocks,
		});
		self
	}

	pub fn with_fill_or_kill_params(mut self, params: FillOrKillParams) -> Self {
		self.fill_or_kill_params = Some(params);
		self
	}

	pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
		self.extra_params = Some(ExtraParams {
			seed: Some(seed.into()),
		});
		self
	}
}
