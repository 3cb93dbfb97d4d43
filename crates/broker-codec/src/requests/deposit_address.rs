//! `broker_request_swap_deposit_address`
//!
//! | # | value |
//! |---|-------|
//! | 0 | source asset |
//! | 1 | destination asset |
//! | 2 | destination address |
//! | 3 | broker commission (bps) |
//! | 4 | CCM metadata or null |
//! | 5 | max boost fee (bps) or null |
//! | 6 | affiliates or null |
//! | 7 | refund parameters or null |
//! | 8 | DCA parameters or null |

use super::{BrokerRequest, REQUEST_SWAP_DEPOSIT_ADDRESS};
use crate::ccm::{encode_ccm_params, CcmChannelMetadata};
use crate::fields::{check_intent, encode_affiliates, encode_dca_params, AffiliateFee, DcaParameters};
use crate::refund::{encode_refund_params, RefundParameters};
use crate::responses::{decode_deposit_channel, DepositChannel};
use broker_address::{wire_address, AddressValidator};
use broker_types::{InternalAsset, Result, SwapIntent};
use serde::ser::{SerializeTuple, Serializer};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAddressRequest {
	pub src_asset: InternalAsset,
	pub dest_asset: InternalAsset,
	pub dest_address: String,
	pub broker_commission_bps: u16,
	pub channel_metadata: Option<CcmChannelMetadata>,
	pub max_boost_fee_bps: Option<u16>,
	pub affiliate_fees: Option<Vec<AffiliateFee>>,
	pub refund_parameters: Option<RefundParameters>,
	pub dca_parameters: Option<DcaParameters>,
	validator: AddressValidator,
}

impl DepositAddressRequest {
	pub const PARAM_COUNT: usize = 9;

	pub fn assemble(intent: &SwapIntent, validator: &AddressValidator) -> Result<Self> {
		check_intent(intent, validator)?;

		let dca_parameters = encode_dca_params(intent.dca_params.as_ref())?;
		let affiliate_fees = encode_affiliates(intent.affiliates.as_deref())?;
		let channel_metadata = intent
			.ccm_params
			.as_ref()
			.map(|ccm| encode_ccm_params(ccm, "ccmParams"))
			.transpose()?;
		let refund_parameters = encode_refund_params(
			intent.fill_or_kill_params.as_ref(),
			intent.src_asset,
			intent.dest_asset,
		)?;

		Ok(Self {
			src_asset: intent.src_asset,
			dest_asset: intent.dest_asset,
			dest_address: wire_address(intent.dest_asset.chain(), &intent.dest_address),
			broker_commission_bps: intent.commission_bps.unwrap_or(0),
			channel_metadata,
			max_boost_fee_bps: intent.max_boost_fee_bps,
			affiliate_fees,
			refund_parameters,
			dca_parameters,
			validator: *validator,
		})
	}
}

impl Serialize for DepositAddressRequest {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut params = serializer.serialize_tuple(Self::PARAM_COUNT)?;
		params.serialize_element(&self.src_asset)?;
		params.serialize_element(&self.dest_asset)?;
		params.serialize_element(&self.dest_address)?;
		params.serialize_element(&self.broker_commission_bps)?;
		params.serialize_element(&self.channel_metadata)?;
		params.serialize_element(&self.max_boost_fee_bps)?;
		params.serialize_element(&self.affiliate_fees)?;
		params.serialize_element(&self.refund_parameters)?;
		params.serialize_element(&self.dca_parameters)?;
		params.end()
	}
}

impl BrokerRequest for DepositAddressRequest {
	type Response = DepositChannel;

	fn method(&self) -> &'static str {
		REQUEST_SWAP_DEPOSIT_ADDRESS
	}

	fn decode_response(&self, result: Value) -> Result<DepositChannel> {
		decode_deposit_channel(
			result,
			self.src_asset.chain(),
			self.broker_commission_bps,
			self.max_boost_fee_bps.unwrap_or(0),
			&self.validator,
		)
	}
}
