//! Handlers for the `broker-cli` subcommands.

use crate::cli::{Method, PriceCommand};
use anyhow::{bail, Context, Result};
use broker_address::AddressValidator;
use broker_codec::{BrokerRequest, CfParametersRequest, DepositAddressRequest, ParameterEncodingRequest};
use broker_config::{load_config, BrokerConfig, ConfigLoader};
use broker_core::{BrokerClient, BrokerClientBuilder};
use broker_rpc::implementations::http::create_http_transport;
use broker_types::{
	from_fixed_point_price, from_hex, to_fixed_point_price, to_hex, Chain, ChainflipNetwork,
	SwapIntent,
};
use serde_json::{json, Value};
use std::path::Path;
use tracing::info;

pub fn price(command: PriceCommand) -> Result<String> {
	match command {
		PriceCommand::ToX128 { price, src, dest } => {
			let value = to_fixed_point_price(&price, src, dest)?;
			Ok(to_hex(value))
		}
		PriceCommand::FromX128 { value, src, dest } => {
			let value = from_hex(&value).context("Invalid fixed-point value")?;
			Ok(from_fixed_point_price(value, src, dest)?.to_string())
		}
	}
}

pub fn validate_address(chain: Chain, network: ChainflipNetwork, address: &str) -> Result<String> {
	match AddressValidator::new(network).check(chain, address) {
		Ok(()) => Ok(format!("{} is a valid {} address on {}", address, chain, network)),
		Err(e) => bail!("{} is not a valid {} address on {}: {}", address, chain, network, e),
	}
}

/// Assembles the request for `method` and renders it as `{method, params}`.
pub fn encode(
	method: Method,
	intent: &SwapIntent,
	network: ChainflipNetwork,
	broker_account: Option<&str>,
) -> Result<Value> {
	let validator = AddressValidator::new(network);
	let rendered = match method {
		Method::RequestSwapDepositAddress => {
			if broker_account.is_some() {
				bail!("request-swap-deposit-address is always sent to the broker API");
			}
			render(&DepositAddressRequest::assemble(intent, &validator)?)?
		}
		Method::RequestSwapParameterEncoding => {
			let mut request = ParameterEncodingRequest::assemble(intent, &validator)?;
			if let Some(account) = broker_account {
				request = request.with_broker_account(account)?;
			}
			render(&request)?
		}
		Method::EncodeCfParameters => {
			let mut request = CfParametersRequest::assemble(intent, &validator)?;
			if let Some(account) = broker_account {
				request = request.with_broker_account(account)?;
			}
			render(&request)?
		}
	};
	Ok(rendered)
}

fn render<R: BrokerRequest>(request: &R) -> Result<Value> {
	Ok(json!({
		"method": request.method(),
		"params": request.params()?,
	}))
}

/// Sends `method` through the configured transport and returns the decoded reply.
pub async fn request(method: Method, intent: &SwapIntent, config: BrokerConfig) -> Result<Value> {
	let client = build_client(config)?;
	let reply = match method {
		Method::RequestSwapDepositAddress => {
			serde_json::to_value(client.request_swap_deposit_address(intent).await?)?
		}
		Method::RequestSwapParameterEncoding => {
			serde_json::to_value(client.request_swap_parameter_encoding(intent).await?)?
		}
		Method::EncodeCfParameters => Value::String(client.encode_cf_parameters(intent).await?),
	};
	Ok(reply)
}

fn build_client(config: BrokerConfig) -> Result<BrokerClient> {
	BrokerClientBuilder::new(config)
		.with_transport_factory(create_http_transport)
		.build()
		.context("Failed to build broker client")
}

pub fn read_intent(path: &Path) -> Result<SwapIntent> {
	let contents = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read intent file {}", path.display()))?;
	serde_json::from_str(&contents)
		.with_context(|| format!("Failed to parse intent file {}", path.display()))
}

pub fn read_config(path: Option<&Path>) -> Result<BrokerConfig> {
	let config = match path {
		Some(path) => ConfigLoader::from_env_and_file(Some(path)),
		None => load_config(),
	}
	.context("Failed to load configuration")?;

	info!(
		network = %config.broker.network,
		url = %config.rpc.url,
		"Configuration loaded"
	);
	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use broker_types::InternalAsset;

	const ETH_ADDRESS: &str = "0x02679b10f7b94fc4f273569cc2e5c49eefa5c0f1";
	const BTC_ADDRESS: &str = "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx";
	const BROKER: &str = "cFHyJEHEQ1YkT9xuFnxnPWVkihpYEGjBg4WbF6vCPtSPQoE8n";

	fn intent() -> SwapIntent {
		serde_json::from_value(json!({
			"srcAsset": { "chain": "Bitcoin", "asset": "BTC" },
			"destAsset": { "chain": "Ethereum", "asset": "ETH" },
			"destAddress": ETH_ADDRESS,
			"amount": "100000000",
			"fillOrKillParams": {
				"retryDurationBlocks": 100,
				"refundAddress": BTC_ADDRESS,
				"minPrice": "20"
			}
		}))
		.unwrap()
	}

	#[test]
	fn test_price_to_x128() {
		let hex = price(PriceCommand::ToX128 {
			price: "1".to_string(),
			src: InternalAsset::Usdc,
			dest: InternalAsset::Usdt,
		})
		.unwrap();
		assert_eq!(hex, "0x100000000000000000000000000000000");

		let back = price(PriceCommand::FromX128 {
			value: hex,
			src: InternalAsset::Usdc,
			dest: InternalAsset::Usdt,
		})
		.unwrap();
		assert_eq!(back, "1");
	}

	#[test]
	fn test_validate_address() {
		assert!(validate_address(Chain::Ethereum, ChainflipNetwork::Mainnet, ETH_ADDRESS).is_ok());
		assert!(validate_address(Chain::Bitcoin, ChainflipNetwork::Mainnet, BTC_ADDRESS).is_err());
	}

	#[test]
	fn test_encode_deposit_address() {
		let rendered = encode(
			Method::RequestSwapDepositAddress,
			&intent(),
			ChainflipNetwork::Perseverance,
			None,
		)
		.unwrap();
		assert_eq!(rendered["method"], "broker_request_swap_deposit_address");
		assert_eq!(rendered["params"].as_array().unwrap().len(), 9);

		assert!(encode(
			Method::RequestSwapDepositAddress,
			&intent(),
			ChainflipNetwork::Perseverance,
			Some(BROKER),
		)
		.is_err());
	}

	#[test]
	fn test_encode_with_broker_account() {
		let rendered = encode(
			Method::EncodeCfParameters,
			&intent(),
			ChainflipNetwork::Perseverance,
			Some(BROKER),
		)
		.unwrap();
		assert_eq!(rendered["method"], "cf_encode_cf_parameters");
		assert_eq!(rendered["params"][0], BROKER);
	}
}
