//! `broker_encode_cf_parameters` / `cf_encode_cf_parameters`
//!
//! | # | value |
//! |---|-------|
//! | 0 | source asset |
//! | 1 | destination asset |
//! | 2 | destination address |
//! | 3 | broker commission (bps) |
//! | 4 | refund parameters or null |
//! | 5 | CCM metadata or null |
//! | 6 | max boost fee (bps) or null |
//! | 7 | affiliates or null |
//! | 8 | DCA parameters or null |
//!
//! The node variant takes the broker account in front of position 0.

use super::{BrokerRequest, ENCODE_CF_PARAMETERS, NODE_ENCODE_CF_PARAMETERS};
use crate::ccm::{encode_ccm_params, CcmChannelMetadata};
use crate::fields::{check_intent, encode_affiliates, encode_dca_params, AffiliateFee, DcaParameters};
use crate::refund::{encode_refund_params, RefundParameters};
use crate::responses::decode_cf_parameters;
use broker_address::{wire_address, AddressValidator};
use broker_types::{AddressRole, InternalAsset, Result, SwapIntent};
use serde::ser::{SerializeTuple, Serializer};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfParametersRequest {
	pub broker_account: Option<String>,
	pub src_asset: InternalAsset,
	pub dest_asset: InternalAsset,
	pub dest_address: String,
	pub broker_commission_bps: u16,
	pub refund_parameters: Option<RefundParameters>,
	pub channel_metadata: Option<CcmChannelMetadata>,
	pub max_boost_fee_bps: Option<u16>,
	pub affiliate_fees: Option<Vec<AffiliateFee>>,
	pub dca_parameters: Option<DcaParameters>,
	validator: AddressValidator,
}

impl CfParametersRequest {
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
			broker_account: None,
			src_asset: intent.src_asset,
			dest_asset: intent.dest_asset,
			dest_address: wire_address(intent.dest_asset.chain(), &intent.dest_address),
			broker_commission_bps: intent.commission_bps.unwrap_or(0),
			refund_parameters,
			channel_metadata,
			max_boost_fee_bps: intent.max_boost_fee_bps,
			affiliate_fees,
			dca_parameters,
			validator: *validator,
		})
	}

	/// Routes the request through a node on behalf of `account`.
	pub fn with_broker_account(mut self, account: &str) -> Result<Self> {
		self.validator
			.validate_chainflip_account(account, AddressRole::BrokerAccount)?;
		self.broker_account = Some(account.to_string());
		Ok(self)
	}
}

impl Serialize for CfParametersRequest {
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
		params.serialize_element(&self.refund_parameters)?;
		params.serialize_element(&self.channel_metadata)?;
		params.serialize_element(&self.max_boost_fee_bps)?;
		params.serialize_element(&self.affiliate_fees)?;
		params.serialize_element(&self.dca_parameters)?;
		params.end()
	}
}

impl BrokerRequest for CfParametersRequest {
	type Response = String;

	fn method(&self) -> &'static str {
		if self.broker_account.is_some() {
			NODE_ENCODE_CF_PARAMETERS
		} else {
			ENCODE_CF_PARAMETERS
		}
	}

	fn decode_response(&self, result: Value) -> Result<String> {
		decode_cf_parameters(result)
	}
}
