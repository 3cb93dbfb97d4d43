//! `broker_request_swap_parameter_encoding` / `cf_request_swap_parameter_encoding`
//!
//! | # | value |
//! |---|-------|
//! | 0 | source asset |
//! | 1 | destination asset |
//! | 2 | destination address |
//! | 3 | broker commission (bps) |
//! | 4 | extra parameters of the source chain |
//! | 5 | CCM metadata or null |
//! | 6 | max boost fee (bps) or null |
//! | 7 | affiliates or null |
//! | 8 | DCA parameters or null |
//!
//! The node variant takes the broker account in front of position 0.

use super::{BrokerRequest, NODE_REQUEST_SWAP_PARAMETER_ENCODING, REQUEST_SWAP_PARAMETER_ENCODING};
use crate::ccm::{encode_ccm_params, CcmChannelMetadata};
use crate::fields::{
	check_bps, check_intent, encode_affiliates, encode_dca_params, AffiliateFee, DcaParameters,
};
use crate::refund::{encode_refund_params, RefundParameters};
use crate::responses::{decode_vault_swap, VaultSwapData};
use broker_address::{wire_address, AddressValidator};
use broker_types::numeric::is_hex_bytes;
use broker_types::{
	apply_fixed_point_price, parse_unsigned, to_fixed_point_price, to_hex, AddressRole, BrokerError,
	Chain, FillOrKillParams, InternalAsset, Result, SwapIntent, U256,
};
use serde::ser::{SerializeTuple, Serializer};
use serde::Serialize;
use serde_json::Value;

const SEED_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvmExtraParameters {
	pub input_amount: String,
	pub refund_parameters: RefundParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolanaExtraParameters {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub seed: Option<String>,
	pub input_amount: String,
	pub refund_parameters: RefundParameters,
}

/// Position 4, tagged with the source chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "chain")]
pub enum VaultSwapExtraParameters {
	/// Bitcoin refunds go back to the sending address, so no refund address is carried.
	Bitcoin {
		min_output_amount: String,
		retry_duration: u32,
		max_oracle_price_slippage: Option<u16>,
	},
	Ethereum(EvmExtraParameters),
	Arbitrum(EvmExtraParameters),
	Solana(SolanaExtraParameters),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterEncodingRequest {
	pub broker_account: Option<String>,
	pub src_asset: InternalAsset,
	pub dest_asset: InternalAsset,
	pub dest_address: String,
	pub broker_commission_bps: u16,
	pub extra_parameters: VaultSwapExtraParameters,
	pub channel_metadata: Option<CcmChannelMetadata>,
	pub max_boost_fee_bps: Option<u16>,
	pub affiliate_fees: Option<Vec<AffiliateFee>>,
	pub dca_parameters: Option<DcaParameters>,
	validator: AddressValidator,
}

fn unsupported_source(src: InternalAsset, dest: InternalAsset) -> BrokerError {
	BrokerError::UnsupportedRoute {
		src_chain: src.chain(),
		dest_chain: dest.chain(),
		reason: format!("parameter encoding is not supported for {}", src.chain()),
	}
}

fn check_seed(seed: &str) -> Result<()> {
	if is_hex_bytes(seed) && seed.len() == 2 + SEED_BYTES * 2 {
		return Ok(());
	}
	Err(BrokerError::invalid_parameter(
		"extraParams.seed",
		format!("expected {} bytes of 0x-prefixed hex", SEED_BYTES),
	))
}

impl ParameterEncodingRequest {
	pub const PARAM_COUNT: usize = 9;

	pub fn assemble(intent: &SwapIntent, validator: &AddressValidator) -> Result<Self> {
		let (src, dest) = (intent.src_asset, intent.dest_asset);
		if matches!(src.chain(), Chain::Polkadot | Chain::Assethub) {
			return Err(unsupported_source(src, dest));
		}
		check_intent(intent, validator)?;

		let amount = intent
			.amount
			.as_deref()
			.ok_or_else(|| BrokerError::MissingRequiredField("amount".to_string()))?;
		let amount = parse_unsigned(amount)
			.map_err(|e| BrokerError::invalid_parameter("amount", e.to_string()))?;
		let fok = intent
			.fill_or_kill_params
			.as_ref()
			.ok_or_else(|| BrokerError::MissingRequiredField("fillOrKillParams".to_string()))?;

		let dca_parameters = encode_dca_params(intent.dca_params.as_ref())?;
		let affiliate_fees = encode_affiliates(intent.affiliates.as_deref())?;
		let channel_metadata = intent
			.ccm_params
			.as_ref()
			.map(|ccm| encode_ccm_params(ccm, "ccmParams"))
			.transpose()?;
		let extra_parameters = Self::extra_parameters(intent, amount, fok)?;

		Ok(Self {
			broker_account: None,
			src_asset: src,
			dest_asset: dest,
			dest_address: wire_address(intent.dest_asset.chain(), &intent.dest_address),
			broker_commission_bps: intent.commission_bps.unwrap_or(0),
			extra_parameters,
			channel_metadata,
			max_boost_fee_bps: intent.max_boost_fee_bps,
			affiliate_fees,
			dca_parameters,
			validator: *validator,
		})
	}

	fn extra_parameters(
		intent: &SwapIntent,
		amount: U256,
		fok: &FillOrKillParams,
	) -> Result<VaultSwapExtraParameters> {
		let (src, dest) = (intent.src_asset, intent.dest_asset);
		let refund_parameters = || -> Result<RefundParameters> {
			encode_refund_params(Some(fok), src, dest)?
				.ok_or_else(|| BrokerError::MissingRequiredField("fillOrKillParams".to_string()))
		};

		let extra = match src.chain() {
			Chain::Bitcoin => {
				if let Some(slippage) = fok.max_oracle_price_slippage {
					check_bps("fillOrKillParams.maxOraclePriceSlippage", slippage)?;
				}
				let min_price = to_fixed_point_price(&fok.min_price, src, dest)?;
				VaultSwapExtraParameters::Bitcoin {
					min_output_amount: to_hex(apply_fixed_point_price(amount, min_price)?),
					retry_duration: fok.retry_duration_blocks,
					max_oracle_price_slippage: fok.max_oracle_price_slippage,
				}
			}
			Chain::Ethereum => VaultSwapExtraParameters::Ethereum(EvmExtraParameters {
				input_amount: to_hex(amount),
				refund_parameters: refund_parameters()?,
			}),
			Chain::Arbitrum => VaultSwapExtraParameters::Arbitrum(EvmExtraParameters {
				input_amount: to_hex(amount),
				refund_parameters: refund_parameters()?,
			}),
			Chain::Solana => {
				let seed = intent.extra_params.as_ref().and_then(|extra| extra.seed.clone());
				if let Some(seed) = &seed {
					check_seed(seed)?;
				}
				VaultSwapExtraParameters::Solana(SolanaExtraParameters {
					from: intent.src_address.clone(),
					seed,
					input_amount: to_hex(amount),
					refund_parameters: refund_parameters()?,
				})
			}
			Chain::Polkadot | Chain::Assethub => return Err(unsupported_source(src, dest)),
		};
		Ok(extra)
	}

	/// Routes the request through a node on behalf of `account`.
	pub fn with_broker_account(mut self, account: &str) -> Result<Self> {
		self.validator
			.validate_chainflip_account(account, AddressRole::BrokerAccount)?;
		self.broker_account = Some(account.to_string());
		Ok(self)
	}
}

impl Serialize for ParameterEncodingRequest {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let len = Self::PARAM_COUNT + usize::from(self.broker_account.is_some());
		let mut params = serializer.serialize_tuple(len)?;
		if let Some(account) = &self.broker_account {
			params.serialize_element(account)?;
		}
		params.serialize_element(&self.src_asset)?;
		params.serialize_element(&self.dest_asset)?;
		params.serialize_element(&self.dest_address)?;
		params.serialize_element(&self.broker_commission_bps)?;
		params.serialize_element(&self.extra_parameters)?;
		params.serialize_element(&self.channel_metadata)?;
		params.serialize_element(&self.max_boost_fee_bps)?;
		params.serialize_element(&self.affiliate_fees)?;
		params.serialize_element(&self.dca_parameters)?;
		params.end()
	}
}

impl BrokerRequest for ParameterEncodingRequest {
	type Response = VaultSwapData;

	fn method(&self) -> &'static str {
		if self.broker_account.is_some() {
			NODE_REQUEST_SWAP_PARAMETER_ENCODING
		} else {
			REQUEST_SWAP_PARAMETER_ENCODING
		}
	}

	fn decode_response(&self, result: Value) -> Result<VaultSwapData> {
		decode_vault_swap(result, self.src_asset.chain(), &self.validator)
	}
}
