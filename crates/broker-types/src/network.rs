//! Chainflip networks and the address conventions each of them expects.

use crate::errors::BrokerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SS58 prefix of the Polkadot relay chain.
pub const POLKADOT_SS58_PREFIX: u16 = 0;
/// Generic Substrate SS58 prefix, used by the test relay chains.
pub const SUBSTRATE_SS58_PREFIX: u16 = 42;
/// SS58 prefix of Chainflip state-chain accounts (`cF...`).
pub const CHAINFLIP_SS58_PREFIX: u16 = 2112;

/// The Chainflip deployment a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainflipNetwork {
	Mainnet,
	Perseverance,
	Sisyphos,
	Backspin,
	Localnet,
}

/// Bitcoin network whose address prefixes a Chainflip network accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitcoinNetwork {
	Mainnet,
	Testnet,
	Regtest,
}

impl ChainflipNetwork {
	pub const ALL: [ChainflipNetwork; 5] = [
		ChainflipNetwork::Mainnet,
		ChainflipNetwork::Perseverance,
		ChainflipNetwork::Sisyphos,
		ChainflipNetwork::Backspin,
		ChainflipNetwork::Localnet,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ChainflipNetwork::Mainnet => "mainnet",
			ChainflipNetwork::Perseverance => "perseverance",
			ChainflipNetwork::Sisyphos => "sisyphos",
			ChainflipNetwork::Backspin => "backspin",
			ChainflipNetwork::Localnet => "localnet",
		}
	}

	pub fn is_mainnet(&self) -> bool {
		matches!(self, ChainflipNetwork::Mainnet)
	}

	pub fn bitcoin_network(&self) -> BitcoinNetwork {
		match self {
			ChainflipNetwork::Mainnet => BitcoinNetwork::Mainnet,
			ChainflipNetwork::Perseverance | ChainflipNetwork::Sisyphos => BitcoinNetwork::Testnet,
			ChainflipNetwork::Backspin | ChainflipNetwork::Localnet => BitcoinNetwork::Regtest,
		}
	}

	/// SS58 prefixes accepted for Polkadot and Assethub addresses.
	///
	/// Paseo-style test relays keep the Polkadot prefix, Westend-style ones use
	/// the generic Substrate prefix.
	pub fn polkadot_ss58_prefixes(&self) -> &'static [u16] {
		if self.is_mainnet() {
			&[POLKADOT_SS58_PREFIX]
		} else {
			&[POLKADOT_SS58_PREFIX, SUBSTRATE_SS58_PREFIX]
		}
	}
}

impl fmt::Display for ChainflipNetwork {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ChainflipNetwork {
	type Err = BrokerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		ChainflipNetwork::ALL
			.into_iter()
			.find(|network| network.as_str().eq_ignore_ascii_case(s.trim()))
			.ok_or_else(|| BrokerError::InvalidParameter {
				field: "network".to_string(),
				message: format!("unknown network {:?}", s),
			})
	}
}

impl BitcoinNetwork {
	/// Base58check version bytes for P2PKH and P2SH addresses.
	pub fn base58_versions(&self) -> [u8; 2] {
		match self {
			BitcoinNetwork::Mainnet => [0x00, 0x05],
			BitcoinNetwork::Testnet | BitcoinNetwork::Regtest => [0x6f, 0xc4],
		}
	}

	/// Human readable part of segwit addresses.
	pub fn bech32_hrp(&self) -> &'static str {
		match self {
			BitcoinNetwork::Mainnet => "bc",
			BitcoinNetwork::Testnet => "tb",
			BitcoinNetwork::Regtest => "bcrt",
		}
	}
}

impl fmt::Display for BitcoinNetwork {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BitcoinNetwork::Mainnet => f.write_str("mainnet"),
			BitcoinNetwork::Testnet => f.write_str("testnet"),
			BitcoinNetwork::Regtest => f.write_str("regtest"),
		}
	}
}
