//! Chains and assets supported by the broker protocol.
//!
//! Every asset belongs to exactly one chain and carries a fixed number of
//! decimals. On the wire an asset is always the pair `{"chain", "asset"}`;
//! internally the pair is collapsed into [`InternalAsset`] so that an invalid
//! combination cannot be represented past the parsing boundary.

use crate::errors::BrokerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Foreign chains reachable through the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
	Ethereum,
	Polkadot,
	Bitcoin,
	Arbitrum,
	Solana,
	Assethub,
}

impl Chain {
	/// All chains in protocol order.
	pub const ALL: [Chain; 6] = [
		Chain::Ethereum,
		Chain::Polkadot,
		Chain::Bitcoin,
		Chain::Arbitrum,
		Chain::Solana,
		Chain::Assethub,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Chain::Ethereum => "Ethereum",
			Chain::Polkadot => "Polkadot",
			Chain::Bitcoin => "Bitcoin",
			Chain::Arbitrum => "Arbitrum",
			Chain::Solana => "Solana",
			Chain::Assethub => "Assethub",
		}
	}

	/// Whether addresses on this chain use the 20-byte EVM format.
	pub fn is_evm(&self) -> bool {
		matches!(self, Chain::Ethereum | Chain::Arbitrum)
	}
}

impl fmt::Display for Chain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Chain {
	type Err = BrokerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Chain::ALL
			.into_iter()
			.find(|chain| chain.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| BrokerError::InvalidParameter {
				field: "chain".to_string(),
				message: format!("unknown chain {:?}", s),
			})
	}
}

/// Asset symbols as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
	Btc,
	Eth,
	Flip,
	Usdc,
	Usdt,
	Wbtc,
	Dot,
	Sol,
}

impl Asset {
	const ALL: [Asset; 8] = [
		Asset::Btc,
		Asset::Eth,
		Asset::Flip,
		Asset::Usdc,
		Asset::Usdt,
		Asset::Wbtc,
		Asset::Dot,
		Asset::Sol,
	];

	pub fn symbol(&self) -> &'static str {
		match self {
			Asset::Btc => "BTC",
			Asset::Eth => "ETH",
			Asset::Flip => "FLIP",
			Asset::Usdc => "USDC",
			Asset::Usdt => "USDT",
			Asset::Wbtc => "WBTC",
			Asset::Dot => "DOT",
			Asset::Sol => "SOL",
		}
	}
}

impl fmt::Display for Asset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

impl FromStr for Asset {
	type Err = BrokerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Asset::ALL
			.into_iter()
			.find(|asset| asset.symbol().eq_ignore_ascii_case(s))
			.ok_or_else(|| BrokerError::InvalidParameter {
				field: "asset".to_string(),
				message: format!("unknown asset {:?}", s),
			})
	}
}

/// The `{chain, asset}` pair exactly as it is exchanged with the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAndChain {
	pub chain: Chain,
	pub asset: Asset,
}

impl AssetAndChain {
	pub fn new(chain: Chain, asset: Asset) -> Self {
		Self { chain, asset }
	}
}

impl fmt::Display for AssetAndChain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.chain, self.asset)
	}
}

/// Parses `Chain:SYMBOL`, e.g. `Arbitrum:USDC`.
impl FromStr for AssetAndChain {
	type Err = BrokerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (chain, asset) = s.split_once(':').ok_or_else(|| BrokerError::InvalidParameter {
			field: "asset".to_string(),
			message: format!("expected <chain>:<asset>, got {:?}", s),
		})?;
		Ok(Self::new(chain.parse()?, asset.parse()?))
	}
}

/// A supported (chain, asset) combination.
///
/// Serializes as [`AssetAndChain`], and deserialization rejects pairs that the
/// protocol does not list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "AssetAndChain", into = "AssetAndChain")]
pub enum InternalAsset {
	Eth,
	Flip,
	Usdc,
	Usdt,
	Wbtc,
	Dot,
	Btc,
	ArbEth,
	ArbUsdc,
	ArbUsdt,
	Sol,
	SolUsdc,
	SolUsdt,
	HubDot,
	HubUsdc,
	HubUsdt,
}

impl InternalAsset {
	pub const ALL: [InternalAsset; 16] = [
		InternalAsset::Eth,
		InternalAsset::Flip,
		InternalAsset::Usdc,
		InternalAsset::Usdt,
		InternalAsset::Wbtc,
		InternalAsset::Dot,
		InternalAsset::Btc,
		InternalAsset::ArbEth,
		InternalAsset::ArbUsdc,
		InternalAsset::ArbUsdt,
		InternalAsset::Sol,
		InternalAsset::SolUsdc,
		InternalAsset::SolUsdt,
		InternalAsset::HubDot,
		InternalAsset::HubUsdc,
		InternalAsset::HubUsdt,
	];

	pub fn chain(&self) -> Chain {
		match self {
			InternalAsset::Eth
			| InternalAsset::Flip
			| InternalAsset::Usdc
			| InternalAsset::Usdt
			| InternalAsset::Wbtc => Chain::Ethereum,
			InternalAsset::Dot => Chain::Polkadot,
			InternalAsset::Btc => Chain::Bitcoin,
			InternalAsset::ArbEth | InternalAsset::ArbUsdc | InternalAsset::ArbUsdt => {
				Chain::Arbitrum
			}
			InternalAsset::Sol | InternalAsset::SolUsdc | InternalAsset::SolUsdt => Chain::Solana,
			InternalAsset::HubDot | InternalAsset::HubUsdc | InternalAsset::HubUsdt => {
				Chain::Assethub
			}
		}
	}

	pub fn asset(&self) -> Asset {
		match self {
			InternalAsset::Eth | InternalAsset::ArbEth => Asset::Eth,
			InternalAsset::Flip => Asset::Flip,
			InternalAsset::Usdc
			| InternalAsset::ArbUsdc
			| InternalAsset::SolUsdc
			| InternalAsset::HubUsdc => Asset::Usdc,
			InternalAsset::Usdt
			| InternalAsset::ArbUsdt
			| InternalAsset::SolUsdt
			| InternalAsset::HubUsdt => Asset::Usdt,
			InternalAsset::Wbtc => Asset::Wbtc,
			InternalAsset::Dot | InternalAsset::HubDot => Asset::Dot,
			InternalAsset::Btc => Asset::Btc,
			InternalAsset::Sol => Asset::Sol,
		}
	}

	/// Number of decimal places of one whole token.
	pub fn decimals(&self) -> u8 {
		match self {
			InternalAsset::Eth | InternalAsset::Flip | InternalAsset::ArbEth => 18,
			InternalAsset::Dot | InternalAsset::HubDot => 10,
			InternalAsset::Sol => 9,
			InternalAsset::Btc | InternalAsset::Wbtc => 8,
			InternalAsset::Usdc
			| InternalAsset::Usdt
			| InternalAsset::ArbUsdc
			| InternalAsset::ArbUsdt
			| InternalAsset::SolUsdc
			| InternalAsset::SolUsdt
			| InternalAsset::HubUsdc
			| InternalAsset::HubUsdt => 6,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			InternalAsset::Eth => "Eth",
			InternalAsset::Flip => "Flip",
			InternalAsset::Usdc => "Usdc",
			InternalAsset::Usdt => "Usdt",
			InternalAsset::Wbtc => "Wbtc",
			InternalAsset::Dot => "Dot",
			InternalAsset::Btc => "Btc",
			InternalAsset::ArbEth => "ArbEth",
			InternalAsset::ArbUsdc => "ArbUsdc",
			InternalAsset::ArbUsdt => "ArbUsdt",
			InternalAsset::Sol => "Sol",
			InternalAsset::SolUsdc => "SolUsdc",
			InternalAsset::SolUsdt => "SolUsdt",
			InternalAsset::HubDot => "HubDot",
			InternalAsset::HubUsdc => "HubUsdc",
			InternalAsset::HubUsdt => "HubUsdt",
		}
	}

	pub fn as_asset_and_chain(&self) -> AssetAndChain {
		AssetAndChain::new(self.chain(), self.asset())
	}
}

impl fmt::Display for InternalAsset {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl TryFrom<AssetAndChain> for InternalAsset {
	type Error = BrokerError;

	fn try_from(value: AssetAndChain) -> Result<Self, Self::Error> {
		InternalAsset::ALL
			.into_iter()
			.find(|internal| internal.chain() == value.chain && internal.asset() == value.asset)
			.ok_or(BrokerError::UnsupportedAsset {
				chain: value.chain,
				asset: value.asset,
			})
	}
}

impl From<InternalAsset> for AssetAndChain {
	fn from(value: InternalAsset) -> Self {
		value.as_asset_and_chain()
	}
}

/// Accepts either `Chain:SYMBOL` or an internal name such as `ArbUsdc`.
impl FromStr for InternalAsset {
	type Err = BrokerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.contains(':') {
			return InternalAsset::try_from(s.parse::<AssetAndChain>()?);
		}
		InternalAsset::ALL
			.into_iter()
			.find(|internal| internal.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| BrokerError::InvalidParameter {
				field: "asset".to_string(),
				message: format!("unknown asset {:?}", s),
			})
	}
}
