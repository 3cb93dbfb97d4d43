//! 20-byte EVM addresses shared by Ethereum and Arbitrum.

use crate::{AddressError, AddressInterface};
use alloy::primitives::Address;
use broker_types::ChainflipNetwork;

const ADDRESS_HEX_LEN: usize = 40;

pub struct EvmAddress;

impl AddressInterface for EvmAddress {
	fn family(&self) -> &'static str {
		"EVM"
	}

	/// EVM addresses carry no network marker, so only the grammar is checked.
	fn validate(&self, address: &str, _network: ChainflipNetwork) -> Result<(), AddressError> {
		let digits = address
			.strip_prefix("0x")
			.ok_or_else(|| AddressError::Format("missing 0x prefix".to_string()))?;

		if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(AddressError::Encoding("non-hex character".to_string()));
		}
		if digits.len() != ADDRESS_HEX_LEN {
			return Err(AddressError::Length {
				expected: ADDRESS_HEX_LEN / 2,
				actual: digits.len() / 2,
			});
		}

		// Mixed case means the sender applied EIP-55 and the casing must verify.
		let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
		let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
		if has_upper && has_lower {
			Address::parse_checksummed(address, None).map_err(|_| AddressError::Checksum)?;
		}

		Ok(())
	}
}
