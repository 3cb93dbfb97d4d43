//! Shared types for the broker protocol codec.
//!
//! Holds the chain and asset registry, the network table, the swap intent
//! value types, the error taxonomy and the two numeric codecs (hex integers
//! and 128.128 fixed-point prices) that every other crate builds on.

pub mod chains;
pub mod errors;
pub mod intent;
pub mod network;
pub mod numeric;
pub mod price;
pub mod validation;

pub use chains::{Asset, AssetAndChain, Chain, InternalAsset};
pub use errors::{AddressRole, BrokerError, Result};
pub use intent::{AffiliateBroker, CcmParams, DcaParams, ExtraParams, FillOrKillParams, SwapIntent};
pub use network::{BitcoinNetwork, ChainflipNetwork};
pub use numeric::{from_hex, parse_unsigned, to_hex, HexError};
pub use price::{apply_fixed_point_price, from_fixed_point_price, to_fixed_point_price};
pub use validation::{ConfigSchema, Field, FieldType, Schema, ValidationError};

pub use alloy::primitives::U256;
pub use rust_decimal::Decimal;
