//! Solana addresses: base58 encoded 32-byte public keys.

use crate::{AddressError, AddressInterface};
use broker_types::ChainflipNetwork;

const PUBKEY_LEN: usize = 32;

pub struct SolanaAddress;

impl AddressInterface for SolanaAddress {
	fn family(&self) -> &'static str {
		"Solana"
	}

	fn validate(&self, address: &str, _network: ChainflipNetwork) -> Result<(), AddressError> {
		let bytes = bs58::decode(address)
			.into_vec()
			.map_err(|e| AddressError::Encoding(e.to_string()))?;

		if bytes.len() != PUBKEY_LEN {
			return Err(AddressError::Length {
				expected: PUBKEY_LEN,
				actual: bytes.len(),
			});
		}
		Ok(())
	}
}
