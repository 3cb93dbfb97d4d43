//! Address validation for the chains reachable through the broker.
//!
//! Each address family lives in its own implementation behind
//! [`AddressInterface`]. [`AddressValidator`] binds a Chainflip network and
//! dispatches on the chain, turning failures into [`BrokerError::InvalidAddress`]
//! so callers learn which address was rejected and why.

use broker_types::{AddressRole, BrokerError, Chain, ChainflipNetwork};
use thiserror::Error;

pub mod implementations {
	pub mod bitcoin;
	pub mod evm;
	pub mod solana;
	pub mod ss58;
}

use implementations::{
	bitcoin::BitcoinAddress,
	evm::EvmAddress,
	solana::SolanaAddress,
	ss58::{decode_ss58, ChainflipAccount, PolkadotAddress},
};

/// Reasons an address is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
	/// The string does not decode in the expected alphabet.
	#[error("malformed encoding: {0}")]
	Encoding(String),
	/// The embedded checksum does not match the payload.
	#[error("checksum mismatch")]
	Checksum,
	/// The decoded payload has the wrong length.
	#[error("expected {expected} bytes, got {actual}")]
	Length { expected: usize, actual: usize },
	/// A well-formed address for another network.
	#[error("address is for {found}, expected {expected}")]
	WrongNetwork { expected: String, found: String },
	/// Any other grammar violation.
	#[error("{0}")]
	Format(String),
}

/// Grammar and network check for one address family.
pub trait AddressInterface: Send + Sync {
	/// Name of the address family used in error messages.
	fn family(&self) -> &'static str;

	/// Returns `Ok` when `address` decodes and belongs to `network`.
	fn validate(&self, address: &str, network: ChainflipNetwork) -> Result<(), AddressError>;
}

fn implementation(chain: Chain) -> &'static dyn AddressInterface {
	match chain {
		Chain::Ethereum | Chain::Arbitrum => &EvmAddress,
		Chain::Bitcoin => &BitcoinAddress,
		Chain::Polkadot | Chain::Assethub => &PolkadotAddress,
		Chain::Solana => &SolanaAddress,
	}
}

/// Validates addresses against one Chainflip network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressValidator {
	network: ChainflipNetwork,
}

impl AddressValidator {
	pub fn new(network: ChainflipNetwork) -> Self {
		Self { network }
	}

	pub fn network(&self) -> ChainflipNetwork {
		self.network
	}

	/// Checks `address` against the format of `chain` without role context.
	pub fn check(&self, chain: Chain, address: &str) -> Result<(), AddressError> {
		implementation(chain).validate(address, self.network)
	}

	/// Checks an address supplied for `role` on `chain`.
	pub fn validate(&self, chain: Chain, address: &str, role: AddressRole) -> Result<(), BrokerError> {
		self.check(chain, address)
			.map_err(|e| invalid_address(chain.as_str(), address, role, e))
	}

	/// Checks a Chainflip state-chain account such as an affiliate.
	pub fn validate_chainflip_account(
		&self,
		account: &str,
		role: AddressRole,
	) -> Result<(), BrokerError> {
		ChainflipAccount
			.validate(account, self.network)
			.map_err(|e| invalid_address(ChainflipAccount.family(), account, role, e))
	}
}

fn invalid_address(family: &str, address: &str, role: AddressRole, error: AddressError) -> BrokerError {
	BrokerError::InvalidAddress {
		chain: family.to_string(),
		role,
		address: address.to_string(),
		reason: error.to_string(),
	}
}

/// Convenience check returning a plain boolean.
pub fn is_valid_address(chain: Chain, address: &str, network: ChainflipNetwork) -> bool {
	implementation(chain).validate(address, network).is_ok()
}

/// The form in which a validated `address` is sent to the broker.
///
/// Polkadot and Assethub addresses travel as the `0x` hex account id; other
/// chains keep the address as supplied.
pub fn wire_address(chain: Chain, address: &str) -> String {
	match chain {
		Chain::Polkadot | Chain::Assethub => decode_ss58(address)
			.map(|decoded| format!("0x{}", hex::encode(decoded.account_id)))
			.unwrap_or_else(|_| address.to_ascii_lowercase()),
		_ => address.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_dispatch_per_chain() {
		let validator = AddressValidator::new(ChainflipNetwork::Mainnet);
		let evm = "0x02679b10f7b94fc4f273569cc2e5c49eefa5c0f1";

		assert!(validator.check(Chain::Ethereum, evm).is_ok());
		assert!(validator.check(Chain::Arbitrum, evm).is_ok());
		assert!(validator.check(Chain::Bitcoin, evm).is_err());
		assert!(validator.check(Chain::Polkadot, evm).is_err());
		assert!(validator.check(Chain::Solana, evm).is_err());
	}

	#[test]
	fn test_testnet_bitcoin_address_rejected_on_mainnet() {
		let validator = AddressValidator::new(ChainflipNetwork::Mainnet);
		let result = validator.validate(
			Chain::Bitcoin,
			"tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx",
			AddressRole::Refund,
		);

		match result {
			Err(BrokerError::InvalidAddress {
				chain,
				role,
				address,
				reason,
			}) => {
				assert_eq!(chain, "Bitcoin");
				assert_eq!(role, AddressRole::Refund);
				assert_eq!(address, "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx");
				assert!(reason.contains("testnet"), "{}", reason);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn test_chainflip_account() {
		let validator = AddressValidator::new(ChainflipNetwork::Perseverance);
		assert!(validator
			.validate_chainflip_account(
				"cFHyJEHEQ1YkT9xuFnxnPWVkihpYEGjBg4WbF6vCPtSPQoE8n",
				AddressRole::Affiliate
			)
			.is_ok());

		let polkadot = validator.validate_chainflip_account(
			"1exaAg2VJRQbyUBAeXcktChCAqjVP9TUxF3zo23R2T6EGdE",
			AddressRole::Affiliate,
		);
		assert!(matches!(
			polkadot,
			Err(BrokerError::InvalidAddress { ref chain, .. }) if chain == "Chainflip"
		));
	}

	#[test]
	fn test_wire_address() {
		assert_eq!(
			wire_address(Chain::Polkadot, "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY"),
			"0xd43593c715fdd31c61141abd04a99fd6822c8558854ccde39a5684e7a56da27d"
		);
		assert_eq!(
			wire_address(Chain::Assethub, "13NZffZRSQFdg5gYLJBdj5jVtkeDPqF3czLdJ9m6fyHcMjki"),
			"0x68ea960a247146eb23892581f389a477ba32db2bd4432915952f8eeca2e91c56"
		);

		let hex_account = format!("0x{}", "AB".repeat(32));
		assert_eq!(
			wire_address(Chain::Polkadot, &hex_account),
			format!("0x{}", "ab".repeat(32))
		);

		let evm = "0x02679b10F7B94fc4f273569cc2e5c49eefa5c0f1";
		assert_eq!(wire_address(Chain::Ethereum, evm), evm);
	}

	#[test]
	fn test_is_valid_address() {
		assert!(is_valid_address(
			Chain::Polkadot,
			"13NZffZRSQFdg5gYLJBdj5jVtkeDPqF3czLdJ9m6fyHcMjki",
			ChainflipNetwork::Mainnet
		));
		assert!(!is_valid_address(
			Chain::Bitcoin,
			"bcrt1qs758ursh4q9z627kt3pp5yysm78ddny6txaqgw",
			ChainflipNetwork::Perseverance
		));
	}
}
