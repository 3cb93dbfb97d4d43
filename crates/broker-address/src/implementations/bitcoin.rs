//! Bitcoin addresses: base58check (P2PKH/P2SH) and bech32/bech32m segwit.

use crate::{AddressError, AddressInterface};
use broker_types::{BitcoinNetwork, ChainflipNetwork};

const BASE58_PAYLOAD_LEN: usize = 21;

pub struct BitcoinAddress;

impl BitcoinAddress {
	fn validate_segwit(address: &str, expected: BitcoinNetwork) -> Result<(), AddressError> {
		let (hrp, _version, _program) = bech32::segwit::decode(address)
			.map_err(|e| AddressError::Encoding(e.to_string()))?;

		let hrp = hrp.to_lowercase();
		if hrp == expected.bech32_hrp() {
			return Ok(());
		}

		let found = [
			BitcoinNetwork::Mainnet,
			BitcoinNetwork::Testnet,
			BitcoinNetwork::Regtest,
		]
		.into_iter()
		.find(|network| network.bech32_hrp() == hrp)
		.map(|network| network.to_string())
		.unwrap_or_else(|| format!("unknown prefix {:?}", hrp));

		Err(AddressError::WrongNetwork {
			expected: expected.to_string(),
			found,
		})
	}

	fn validate_base58(address: &str, expected: BitcoinNetwork) -> Result<(), AddressError> {
		let payload = bs58::decode(address)
			.with_check(None)
			.into_vec()
			.map_err(|e| match e {
				bs58::decode::Error::InvalidChecksum { .. } => AddressError::Checksum,
				other => AddressError::Encoding(other.to_string()),
			})?;

		if payload.len() != BASE58_PAYLOAD_LEN {
			return Err(AddressError::Length {
				expected: BASE58_PAYLOAD_LEN,
				actual: payload.len(),
			});
		}

		let version = payload[0];
		if expected.base58_versions().contains(&version) {
			return Ok(());
		}

		let found = if BitcoinNetwork::Mainnet.base58_versions().contains(&version) {
			BitcoinNetwork::Mainnet.to_string()
		} else if BitcoinNetwork::Testnet.base58_versions().contains(&version) {
			BitcoinNetwork::Testnet.to_string()
		} else {
			return Err(AddressError::Format(format!(
				"unknown version byte 0x{:02x}",
				version
			)));
		};

		Err(AddressError::WrongNetwork {
			expected: expected.to_string(),
			found,
		})
	}
}

impl AddressInterface for BitcoinAddress {
	fn family(&self) -> &'static str {
		"Bitcoin"
	}

	fn validate(&self, address: &str, network: ChainflipNetwork) -> Result<(), AddressError> {
		let expected = network.bitcoin_network();
		let lower = address.to_ascii_lowercase();

		if ["bc1", "tb1", "bcrt1"]
			.iter()
			.any(|prefix| lower.starts_with(prefix))
		{
			Self::validate_segwit(address, expected)
		} else {
			Self::validate_base58(address, expected)
		}
	}
}
