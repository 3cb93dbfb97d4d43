//! Decoders for the replies of the three broker methods.
//!
//! Replies use snake_case field names; the decoded values serialize in
//! camelCase. Every integer is decoded into a [`U256`] whether it arrives as a
//! JSON number or a hex string. A reply that does not have the expected shape
//! is rejected with [`BrokerError::MalformedResponse`].

use broker_address::AddressValidator;
use broker_types::numeric::{deserialize_number_or_hex, is_hex_bytes, serialize_hex};
use broker_types::{BrokerError, Chain, Result, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn malformed(message: impl Into<String>) -> BrokerError {
	BrokerError::MalformedResponse(message.into())
}

fn check_hex_field(field: &str, value: &str) -> Result<()> {
	if is_hex_bytes(value) {
		Ok(())
	} else {
		Err(malformed(format!("{} is not hex encoded: {:?}", field, value)))
	}
}

fn check_address(validator: &AddressValidator, chain: Chain, field: &str, address: &str) -> Result<()> {
	validator
		.check(chain, address)
		.map_err(|e| malformed(format!("{} {:?} is not a {} address: {}", field, address, chain, e)))
}

/// An opened deposit channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositChannel {
	/// `{issued_block}-{chain}-{channel_id}`.
	pub deposit_channel_id: String,
	pub address: String,
	pub src_chain: Chain,
	pub issued_block: u64,
	pub channel_id: u64,
	#[serde(serialize_with = "serialize_hex")]
	pub source_chain_expiry_block: U256,
	#[serde(serialize_with = "serialize_hex")]
	pub channel_opening_fee: U256,
	pub broker_commission_bps: u16,
	pub max_boost_fee_bps: u16,
}

#[derive(Deserialize)]
struct RawDepositChannel {
	address: String,
	issued_block: u64,
	channel_id: u64,
	#[serde(deserialize_with = "deserialize_number_or_hex")]
	source_chain_expiry_block: U256,
	#[serde(deserialize_with = "deserialize_number_or_hex")]
	channel_opening_fee: U256,
}

/// Decodes a `request_swap_deposit_address` reply for a swap from `src_chain`.
///
/// The commission and boost fee are not part of the reply and are echoed from
/// the request.
pub fn decode_deposit_channel(
	result: Value,
	src_chain: Chain,
	broker_commission_bps: u16,
	max_boost_fee_bps: u16,
	validator: &AddressValidator,
) -> Result<DepositChannel> {
	let raw: RawDepositChannel =
		serde_json::from_value(result).map_err(|e| malformed(format!("deposit channel: {}", e)))?;
	check_address(validator, src_chain, "address", &raw.address)?;

	Ok(DepositChannel {
		deposit_channel_id: format!("{}-{}-{}", raw.issued_block, src_chain, raw.channel_id),
		address: raw.address,
		src_chain,
		issued_block: raw.issued_block,
		channel_id: raw.channel_id,
		source_chain_expiry_block: raw.source_chain_expiry_block,
		channel_opening_fee: raw.channel_opening_fee,
		broker_commission_bps,
		max_boost_fee_bps,
	})
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct BitcoinVaultSwap {
	pub nulldata_payload: String,
	pub deposit_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct EvmVaultSwap {
	/// Native amount to attach to the transaction.
	#[serde(
		serialize_with = "serialize_hex",
		deserialize_with = "deserialize_number_or_hex"
	)]
	pub value: U256,
	pub to: String,
	pub calldata: String,
	/// Token to approve before sending; absent for native assets.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_token_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SolanaAccount {
	pub pubkey: String,
	pub is_signer: bool,
	pub is_writable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SolanaVaultSwap {
	pub program_id: String,
	pub data: String,
	pub accounts: Vec<SolanaAccount>,
}

/// Transaction data for a vault swap, tagged with the source chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "chain")]
pub enum VaultSwapData {
	Bitcoin(BitcoinVaultSwap),
	Ethereum(EvmVaultSwap),
	Arbitrum(EvmVaultSwap),
	Solana(SolanaVaultSwap),
}

impl VaultSwapData {
	pub fn chain(&self) -> Chain {
		match self {
			VaultSwapData::Bitcoin(_) => Chain::Bitcoin,
			VaultSwapData::Ethereum(_) => Chain::Ethereum,
			VaultSwapData::Arbitrum(_) => Chain::Arbitrum,
			VaultSwapData::Solana(_) => Chain::Solana,
		}
	}
}

/// Decodes a `request_swap_parameter_encoding` reply for a swap from `src_chain`.
pub fn decode_vault_swap(
	result: Value,
	src_chain: Chain,
	validator: &AddressValidator,
) -> Result<VaultSwapData> {
	let data: VaultSwapData =
		serde_json::from_value(result).map_err(|e| malformed(format!("vault swap: {}", e)))?;

	if data.chain() != src_chain {
		return Err(malformed(format!(
			"expected a {} vault swap, got {}",
			src_chain,
			data.chain()
		)));
	}

	match &data {
		VaultSwapData::Bitcoin(swap) => {
			check_hex_field("nulldata_payload", &swap.nulldata_payload)?;
			check_address(validator, Chain::Bitcoin, "deposit_address", &swap.deposit_address)?;
		}
		VaultSwapData::Ethereum(swap) | VaultSwapData::Arbitrum(swap) => {
			check_hex_field("calldata", &swap.calldata)?;
			check_address(validator, src_chain, "to", &swap.to)?;
			if let Some(token) = &swap.source_token_address {
				check_address(validator, src_chain, "source_token_address", token)?;
			}
		}
		VaultSwapData::Solana(swap) => {
			check_hex_field("data", &swap.data)?;
			check_address(validator, Chain::Solana, "program_id", &swap.program_id)?;
			for account in &swap.accounts {
				check_address(validator, Chain::Solana, "pubkey", &account.pubkey)?;
			}
		}
	}

	Ok(data)
}

/// Decodes an `encode_cf_parameters` reply: the hex encoded parameters.
pub fn decode_cf_parameters(result: Value) -> Result<String> {
	match result {
		Value::String(encoded) => {
			check_hex_field("cf parameters", &encoded)?;
			Ok(encoded)
		}
		other => Err(malformed(format!("expected a hex string, got {}", other))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use broker_types::ChainflipNetwork;
	use serde_json::json;

	fn validator() -> AddressValidator {
		AddressValidator::new(ChainflipNetwork::Backspin)
	}

	#[test]
	fn test_deposit_channel_with_numeric_expiry() {
		let reply = json!({
			"address": "0xe720e23695c9ef06aba7ab4e8e8e6ab4b5e2a4b9",
			"issued_block": 50,
			"channel_id": 0,
			"source_chain_expiry_block": 1234,
			"channel_opening_fee": "0x0"
		});
		let channel = decode_deposit_channel(reply, Chain::Ethereum, 15, 0, &validator()).unwrap();

		assert_eq!(channel.deposit_channel_id, "50-Ethereum-0");
		assert_eq!(channel.source_chain_expiry_block, U256::from(1234u64));
		assert_eq!(channel.channel_opening_fee, U256::ZERO);
		assert_eq!(channel.broker_commission_bps, 15);
	}

	#[test]
	fn test_deposit_channel_with_hex_expiry() {
		let reply = json!({
			"address": "bcrt1pmrhjpvq2w7cgesrcrvuhqw6n6j487l6uc7tmwtx9jen7ezesunhqllvzxx",
			"issued_block": 200,
			"channel_id": 7,
			"source_chain_expiry_block": "0x4d2",
			"channel_opening_fee": "0x16345785d8a0000"
		});
		let channel = decode_deposit_channel(reply, Chain::Bitcoin, 0, 30, &validator()).unwrap();

		assert_eq!(channel.deposit_channel_id, "200-Bitcoin-7");
		assert_eq!(channel.source_chain_expiry_block, U256::from(1234u64));
		assert_eq!(
			channel.channel_opening_fee,
			U256::from(100_000_000_000_000_000u64)
		);
		assert_eq!(channel.max_boost_fee_bps, 30);

		let output = serde_json::to_value(&channel).unwrap();
		assert_eq!(output["depositChannelId"], "200-Bitcoin-7");
		assert_eq!(output["sourceChainExpiryBlock"], "0x4d2");
		assert_eq!(output["srcChain"], "Bitcoin");
	}

	#[test]
	fn test_deposit_channel_rejects_bad_replies() {
		let missing_fee = json!({
			"address": "0xe720e23695c9ef06aba7ab4e8e8e6ab4b5e2a4b9",
			"issued_block": 50,
			"channel_id": 0,
			"source_chain_expiry_block": 1234
		});
		assert!(matches!(
			decode_deposit_channel(missing_fee, Chain::Ethereum, 0, 0, &validator()),
			Err(BrokerError::MalformedResponse(_))
		));

		let wrong_chain = json!({
			"address": "0xe720e23695c9ef06aba7ab4e8e8e6ab4b5e2a4b9",
			"issued_block": 50,
			"channel_id": 0,
			"source_chain_expiry_block": 1234,
			"channel_opening_fee": 0
		});
		assert!(matches!(
			decode_deposit_channel(wrong_chain, Chain::Bitcoin, 0, 0, &validator()),
			Err(BrokerError::MalformedResponse(_))
		));
	}

	#[test]
	fn test_bitcoin_vault_swap() {
		let reply = json!({
			"chain": "Bitcoin",
			"nulldata_payload": "0x0003656623d865425c0a4955ef7debbfd2e2d0d3b3e2c7b33a0e2a3c4e2e9b5b",
			"deposit_address": "bcrt1pmrhjpvq2w7cgesrcrvuhqw6n6j487l6uc7tmwtx9jen7ezesunhqllvzxx"
		});
		let data = decode_vault_swap(reply, Chain::Bitcoin, &validator()).unwrap();
		assert_eq!(data.chain(), Chain::Bitcoin);

		let output = serde_json::to_value(&data).unwrap();
		assert_eq!(output["chain"], "Bitcoin");
		assert_eq!(
			output["depositAddress"],
			"bcrt1pmrhjpvq2w7cgesrcrvuhqw6n6j487l6uc7tmwtx9jen7ezesunhqllvzxx"
		);
	}

	#[test]
	fn test_evm_vault_swap() {
		let reply = json!({
			"chain": "Arbitrum",
			"value": "0xde0b6b3a7640000",
			"to": "0xb7f8bc63bbcad18155201308c8f3540b07f84f5e",
			"calldata": "0xdd68734500",
			"source_token_address": "0xa51c1fc2f0d1a1b8494ed1fe312d7c3a78ed91c0"
		});
		match decode_vault_swap(reply, Chain::Arbitrum, &validator()).unwrap() {
			VaultSwapData::Arbitrum(swap) => {
				assert_eq!(swap.value, U256::from(1_000_000_000_000_000_000u64));
				assert_eq!(swap.calldata, "0xdd68734500");
				assert!(swap.source_token_address.is_some());
			}
			other => panic!("unexpected vault swap: {:?}", other),
		}
	}

	#[test]
	fn test_solana_vault_swap_renames_account_flags() {
		let reply = json!({
			"chain": "Solana",
			"program_id": "4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw",
			"data": "0xa3265ce2f3698dc4",
			"accounts": [
				{ "pubkey": "4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw", "is_signer": true, "is_writable": false },
				{ "pubkey": "11111111111111111111111111111111", "is_signer": false, "is_writable": true }
			]
		});
		let data = decode_vault_swap(reply, Chain::Solana, &validator()).unwrap();
		let output = serde_json::to_value(&data).unwrap();

		assert_eq!(output["programId"], "4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw");
		assert_eq!(
			output["accounts"],
			json!([
				{ "pubkey": "4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw", "isSigner": true, "isWritable": false },
				{ "pubkey": "11111111111111111111111111111111", "isSigner": false, "isWritable": true }
			])
		);
	}

	#[test]
	fn test_vault_swap_rejects_mismatched_or_missing_chain() {
		let ethereum = json!({
			"chain": "Ethereum",
			"value": "0x0",
			"to": "0xb7f8bc63bbcad18155201308c8f3540b07f84f5e",
			"calldata": "0x"
		});
		assert!(matches!(
			decode_vault_swap(ethereum.clone(), Chain::Arbitrum, &validator()),
			Err(BrokerError::MalformedResponse(_))
		));
		assert!(decode_vault_swap(ethereum, Chain::Ethereum, &validator()).is_ok());

		let untagged = json!({ "nulldata_payload": "0x00", "deposit_address": "x" });
		assert!(matches!(
			decode_vault_swap(untagged, Chain::Bitcoin, &validator()),
			Err(BrokerError::MalformedResponse(_))
		));
	}

	#[test]
	fn test_cf_parameters() {
		assert_eq!(
			decode_cf_parameters(json!("0x0a0b")),
			Ok("0x0a0b".to_string())
		);
		assert!(decode_cf_parameters(json!("0a0b")).is_err());
		assert!(decode_cf_parameters(json!({ "data": "0x" })).is_err());
	}
}
