//! Checks and encoders for the intent fields all three methods accept.
//!
//! Only field-level work lives here. Each method places the results itself;
//! see the `requests` module.

use broker_address::AddressValidator;
use broker_types::{
	AddressRole, AffiliateBroker, BrokerError, DcaParams, InternalAsset, Result, SwapIntent,
};
use serde::Serialize;

/// Upper bound of every basis-point field.
pub const MAX_BPS: u16 = 10_000;
/// Largest number of affiliates a single swap may carry.
pub const MAX_AFFILIATES: usize = 5;

/// Wire form of [`DcaParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DcaParameters {
	pub number_of_chunks: u32,
	pub chunk_interval: u32,
}

/// Wire form of [`AffiliateBroker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffiliateFee {
	pub account: String,
	pub bps: u16,
}

pub fn check_bps(field: &str, value: u16) -> Result<()> {
	if value > MAX_BPS {
		return Err(BrokerError::invalid_parameter(
			field,
			format!("{} exceeds the maximum of {} bps", value, MAX_BPS),
		));
	}
	Ok(())
}

/// Rejects asset pairs the network never swaps.
pub fn check_route(src: InternalAsset, dest: InternalAsset) -> Result<()> {
	let reason = if src == dest {
		"source and destination asset are the same"
	} else if matches!(
		(src, dest),
		(InternalAsset::Dot, InternalAsset::HubDot) | (InternalAsset::HubDot, InternalAsset::Dot)
	) {
		"DOT cannot be swapped between Polkadot and Assethub"
	} else {
		return Ok(());
	};

	Err(BrokerError::UnsupportedRoute {
		src_chain: src.chain(),
		dest_chain: dest.chain(),
		reason: reason.to_string(),
	})
}

/// Runs every check that does not depend on the target method.
///
/// Order: route, addresses (destination, source, refund, affiliates), basis
/// points, then the DCA and fill-or-kill coupling.
pub fn check_intent(intent: &SwapIntent, validator: &AddressValidator) -> Result<()> {
	check_route(intent.src_asset, intent.dest_asset)?;

	let src_chain = intent.src_asset.chain();
	validator.validate(
		intent.dest_asset.chain(),
		&intent.dest_address,
		AddressRole::Destination,
	)?;
	if let Some(src_address) = &intent.src_address {
		validator.validate(src_chain, src_address, AddressRole::Source)?;
	}
	if let Some(fok) = &intent.fill_or_kill_params {
		validator.validate(src_chain, &fok.refund_address, AddressRole::Refund)?;
	}
	for affiliate in intent.affiliates.iter().flatten() {
		validator.validate_chainflip_account(&affiliate.account, AddressRole::Affiliate)?;
	}

	if let Some(bps) = intent.commission_bps {
		check_bps("commissionBps", bps)?;
	}
	if let Some(bps) = intent.max_boost_fee_bps {
		check_bps("maxBoostFeeBps", bps)?;
	}

	if intent.dca_params.is_some() && intent.fill_or_kill_params.is_none() {
		return Err(BrokerError::InvalidDcaParams(
			"Fill or kill parameters are required for DCA".to_string(),
		));
	}

	Ok(())
}

pub fn encode_dca_params(params: Option<&DcaParams>) -> Result<Option<DcaParameters>> {
	let Some(params) = params else {
		return Ok(None);
	};
	if params.number_of_chunks == 0 {
		return Err(BrokerError::InvalidDcaParams(
			"number of chunks must be at least 1".to_string(),
		));
	}
	Ok(Some(DcaParameters {
		number_of_chunks: params.number_of_chunks,
		chunk_interval: params.chunk_interval_blocks,
	}))
}

/// Encodes affiliates in the order given. Accounts are checked by [`check_intent`].
pub fn encode_affiliates(affiliates: Option<&[AffiliateBroker]>) -> Result<Option<Vec<AffiliateFee>>> {
	let Some(affiliates) = affiliates else {
		return Ok(None);
	};
	if affiliates.len() > MAX_AFFILIATES {
		return Err(BrokerError::invalid_parameter(
			"affiliates",
			format!("at most {} affiliates are allowed", MAX_AFFILIATES),
		));
	}

	affiliates
		.iter()
		.enumerate()
		.map(|(i, affiliate)| {
			check_bps(&format!("affiliates[{}].commissionBps", i), affiliate.commission_bps)?;
			Ok(AffiliateFee {
				account: affiliate.account.clone(),
				bps: affiliate.commission_bps,
			})
		})
		.collect::<Result<Vec<_>>>()
		.map(Some)
}

#[cfg(test)]
mod tests {
	use super::*;
	use broker_types::{Chain, ChainflipNetwork, FillOrKillParams};
	use serde_json::json;

	const AFFILIATE: &str = "cFHyJEHEQ1YkT9xuFnxnPWVkihpYEGjBg4WbF6vCPtSPQoE8n";
	const ETH_ADDRESS: &str = "0x02679b10f7b94fc4f273569cc2e5c49eefa5c0f1";

	fn validator() -> AddressValidator {
		AddressValidator::new(ChainflipNetwork::Perseverance)
	}

	#[test]
	fn test_dca_pass_through() {
		let encoded = encode_dca_params(Some(&DcaParams {
			number_of_chunks: 100,
			chunk_interval_blocks: 5,
		}))
		.unwrap();
		assert_eq!(
			serde_json::to_value(encoded).unwrap(),
			json!({ "number_of_chunks": 100, "chunk_interval": 5 })
		);
		assert_eq!(encode_dca_params(None), Ok(None));
	}

	#[test]
	fn test_dca_rejects_zero_chunks() {
		let result = encode_dca_params(Some(&DcaParams {
			number_of_chunks: 0,
			chunk_interval_blocks: 5,
		}));
		assert!(matches!(result, Err(BrokerError::InvalidDcaParams(_))));
	}

	#[test]
	fn test_affiliates_keep_order_and_rename_bps() {
		let affiliates = vec![
			AffiliateBroker {
				account: "b".to_string(),
				commission_bps: 20,
			},
			AffiliateBroker {
				account: "a".to_string(),
				commission_bps: 10,
			},
		];
		let encoded = encode_affiliates(Some(affiliates.as_slice())).unwrap();
		assert_eq!(
			serde_json::to_value(encoded).unwrap(),
			json!([{ "account": "b", "bps": 20 }, { "account": "a", "bps": 10 }])
		);
	}

	#[test]
	fn test_affiliate_limits() {
		let affiliate = AffiliateBroker {
			account: AFFILIATE.to_string(),
			commission_bps: 1,
		};
		let too_many = vec![affiliate.clone(); MAX_AFFILIATES + 1];
		assert!(encode_affiliates(Some(too_many.as_slice())).is_err());

		let too_much = vec![AffiliateBroker {
			commission_bps: MAX_BPS + 1,
			..affiliate
		}];
		assert!(matches!(
			encode_affiliates(Some(too_much.as_slice())),
			Err(BrokerError::InvalidParameter { ref field, .. }) if field == "affiliates[0].commissionBps"
		));
	}

	#[test]
	fn test_route_checks() {
		assert!(check_route(InternalAsset::Btc, InternalAsset::Eth).is_ok());
		assert!(check_route(InternalAsset::Dot, InternalAsset::HubUsdc).is_ok());
		assert!(matches!(
			check_route(InternalAsset::Dot, InternalAsset::HubDot),
			Err(BrokerError::UnsupportedRoute {
				src_chain: Chain::Polkadot,
				dest_chain: Chain::Assethub,
				..
			})
		));
		assert!(check_route(InternalAsset::Eth, InternalAsset::Eth).is_err());
	}

	#[test]
	fn test_dca_requires_fill_or_kill() {
		let intent =
			SwapIntent::new(InternalAsset::Btc, InternalAsset::Eth, ETH_ADDRESS).with_dca_params(10, 2);
		assert_eq!(
			check_intent(&intent, &validator()),
			Err(BrokerError::InvalidDcaParams(
				"Fill or kill parameters are required for DCA".to_string()
			))
		);
	}

	#[test]
	fn test_addresses_are_checked_in_order() {
		// Both the destination and the refund address are wrong; the destination is reported.
		let intent = SwapIntent::new(InternalAsset::Btc, InternalAsset::Eth, "not-an-address")
			.with_fill_or_kill_params(FillOrKillParams::new(10, ETH_ADDRESS, "1"));
		assert!(matches!(
			check_intent(&intent, &validator()),
			Err(BrokerError::InvalidAddress {
				role: AddressRole::Destination,
				..
			})
		));

		let intent = SwapIntent::new(InternalAsset::Btc, InternalAsset::Eth, ETH_ADDRESS)
			.with_fill_or_kill_params(FillOrKillParams::new(10, ETH_ADDRESS, "1"));
		assert!(matches!(
			check_intent(&intent, &validator()),
			Err(BrokerError::InvalidAddress {
				role: AddressRole::Refund,
				..
			})
		));
	}

	#[test]
	fn test_mainnet_rejects_testnet_refund_address() {
		let intent = SwapIntent::new(InternalAsset::Btc, InternalAsset::Eth, ETH_ADDRESS)
			.with_fill_or_kill_params(FillOrKillParams::new(
				10,
				"tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx",
				"1",
			));
		let result = check_intent(&intent, &AddressValidator::new(ChainflipNetwork::Mainnet));
		assert!(matches!(
			result,
			Err(BrokerError::InvalidAddress {
				role: AddressRole::Refund,
				ref chain,
				..
			}) if chain == "Bitcoin"
		));
	}

	#[test]
	fn test_affiliate_account_and_bps_checks() {
		let intent = SwapIntent::new(InternalAsset::Btc, InternalAsset::Eth, ETH_ADDRESS)
			.with_affiliate(ETH_ADDRESS, 10);
		assert!(matches!(
			check_intent(&intent, &validator()),
			Err(BrokerError::InvalidAddress {
				role: AddressRole::Affiliate,
				..
			})
		));

		let intent = SwapIntent::new(InternalAsset::Btc, InternalAsset::Eth, ETH_ADDRESS)
			.with_affiliate(AFFILIATE, 10)
			.with_commission_bps(MAX_BPS + 1);
		assert!(matches!(
			check_intent(&intent, &validator()),
			Err(BrokerError::InvalidParameter { ref field, .. }) if field == "commissionBps"
		));
	}
}
