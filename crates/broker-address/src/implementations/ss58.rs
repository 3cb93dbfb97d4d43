//! SS58 addresses for Polkadot, Assethub and Chainflip state-chain accounts.
//!
//! Layout: `prefix (1 or 2 bytes) ‖ account id (32 bytes) ‖ checksum (2 bytes)`
//! where the checksum is the start of `blake2b-512("SS58PRE" ‖ prefix ‖ account id)`.
//! A raw 32-byte account id in `0x` hex is accepted as well.

use crate::{AddressError, AddressInterface};
use blake2::{Blake2b512, Digest};
use broker_types::network::CHAINFLIP_SS58_PREFIX;
use broker_types::ChainflipNetwork;

const ACCOUNT_ID_LEN: usize = 32;
const CHECKSUM_LEN: usize = 2;
const CHECKSUM_PREIMAGE_PREFIX: &[u8] = b"SS58PRE";

/// A decoded SS58 address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ss58 {
	pub prefix: u16,
	pub account_id: [u8; ACCOUNT_ID_LEN],
}

/// Decodes an SS58 address and verifies its checksum.
pub fn decode_ss58(address: &str) -> Result<Ss58, AddressError> {
	let bytes = bs58::decode(address)
		.into_vec()
		.map_err(|e| AddressError::Encoding(e.to_string()))?;

	let first = *bytes
		.first()
		.ok_or_else(|| AddressError::Encoding("empty address".to_string()))?;
	let (prefix, prefix_len) = match first {
		0..=63 => (u16::from(first), 1),
		64..=127 => {
			let second = *bytes
				.get(1)
				.ok_or_else(|| AddressError::Encoding("truncated prefix".to_string()))?;
			let prefix = (u16::from(first & 0x3f) << 2)
				| u16::from(second >> 6)
				| (u16::from(second & 0x3f) << 8);
			(prefix, 2)
		}
		_ => {
			return Err(AddressError::Format(format!(
				"reserved prefix byte 0x{:02x}",
				first
			)))
		}
	};

	let expected_len = prefix_len + ACCOUNT_ID_LEN + CHECKSUM_LEN;
	if bytes.len() != expected_len {
		return Err(AddressError::Length {
			expected: expected_len,
			actual: bytes.len(),
		});
	}

	let (body, checksum) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
	let mut hasher = Blake2b512::new();
	hasher.update(CHECKSUM_PREIMAGE_PREFIX);
	hasher.update(body);
	if hasher.finalize()[..CHECKSUM_LEN] != *checksum {
		return Err(AddressError::Checksum);
	}

	let mut account_id = [0u8; ACCOUNT_ID_LEN];
	account_id.copy_from_slice(&body[prefix_len..]);
	Ok(Ss58 { prefix, account_id })
}

/// Whether `address` is a `0x`-hex 32-byte account id.
fn is_hex_account_id(address: &str) -> bool {
	address
		.strip_prefix("0x")
		.and_then(|digits| hex::decode(digits).ok())
		.is_some_and(|bytes| bytes.len() == ACCOUNT_ID_LEN)
}

fn check_prefix(found: u16, allowed: &[u16]) -> Result<(), AddressError> {
	if allowed.contains(&found) {
		return Ok(());
	}
	let expected = allowed
		.iter()
		.map(|prefix| prefix.to_string())
		.collect::<Vec<_>>()
		.join(" or ");
	Err(AddressError::WrongNetwork {
		expected: format!("SS58 prefix {}", expected),
		found: format!("SS58 prefix {}", found),
	})
}

/// Polkadot relay chain and Assethub addresses.
pub struct PolkadotAddress;

impl AddressInterface for PolkadotAddress {
	fn family(&self) -> &'static str {
		"Polkadot"
	}

	fn validate(&self, address: &str, network: ChainflipNetwork) -> Result<(), AddressError> {
		if is_hex_account_id(address) {
			return Ok(());
		}
		let decoded = decode_ss58(address)?;
		check_prefix(decoded.prefix, network.polkadot_ss58_prefixes())
	}
}

/// Chainflip state-chain accounts (`cF...`).
pub struct ChainflipAccount;

impl AddressInterface for ChainflipAccount {
	fn family(&self) -> &'static str {
		"Chainflip"
	}

	fn validate(&self, address: &str, _network: ChainflipNetwork) -> Result<(), AddressError> {
		if is_hex_account_id(address) {
			return Ok(());
		}
		let decoded = decode_ss58(address)?;
		check_prefix(decoded.prefix, &[CHAINFLIP_SS58_PREFIX])
	}
}
