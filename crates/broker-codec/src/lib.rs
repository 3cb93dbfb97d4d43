//! Request assembly and reply decoding for the broker methods.
//!
//! A [`SwapIntent`](broker_types::SwapIntent) is checked and turned into one of
//! three request types, each of which knows its method name, serializes to
//! the method's positional parameter array and decodes the method's reply.
//! Everything here is pure; sending is left to the caller.

pub mod ccm;
pub mod fields;
pub mod refund;
pub mod requests;
pub mod responses;

pub use ccm::{encode_ccm_params, CcmChannelMetadata};
pub use fields::{check_intent, AffiliateFee, DcaParameters, MAX_AFFILIATES, MAX_BPS};
pub use refund::{encode_refund_params, RefundParameters};
pub use requests::{
	cf_parameters::CfParametersRequest,
	deposit_address::DepositAddressRequest,
	parameter_encoding::{ParameterEncodingRequest, VaultSwapExtraParameters},
	BrokerRequest,
};
pub use responses::{
	BitcoinVaultSwap, DepositChannel, EvmVaultSwap, SolanaAccount, SolanaVaultSwap, VaultSwapData,
};
