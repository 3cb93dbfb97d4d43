//! Command-line interface definitions.

use broker_types::{Chain, ChainflipNetwork, InternalAsset};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "broker-cli")]
#[command(about = "Encode, validate and send Chainflip broker requests", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
	/// Path to configuration file
	#[arg(short, long, value_name = "FILE", env = "BROKER_CONFIG")]
	pub config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, env = "BROKER_LOG_LEVEL", default_value = "warn")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Convert between human prices and 128.128 fixed-point prices
	#[command(subcommand)]
	Price(PriceCommand),

	/// Check an address against a chain and network
	ValidateAddress {
		#[arg(long)]
		chain: Chain,
		#[arg(long, default_value = "mainnet")]
		network: ChainflipNetwork,
		address: String,
	},

	/// Print the positional parameters for a broker method without sending them
	Encode {
		method: Method,
		/// Swap intent as camelCase JSON
		#[arg(long, value_name = "FILE")]
		intent: PathBuf,
		#[arg(long, default_value = "perseverance")]
		network: ChainflipNetwork,
		/// Route through a node on behalf of this broker account
		#[arg(long)]
		broker_account: Option<String>,
	},

	/// Send a broker method through the configured RPC endpoint
	Request {
		method: Method,
		/// Swap intent as camelCase JSON
		#[arg(long, value_name = "FILE")]
		intent: PathBuf,
	},
}

#[derive(Subcommand, Debug)]
pub enum PriceCommand {
	/// Human price to a fixed-point hex value
	ToX128 {
		price: String,
		/// Source asset, e.g. `Bitcoin:BTC`
		#[arg(long)]
		src: InternalAsset,
		/// Destination asset, e.g. `Ethereum:USDC`
		#[arg(long)]
		dest: InternalAsset,
	},
	/// Fixed-point hex value to a human price
	FromX128 {
		value: String,
		#[arg(long)]
		src: InternalAsset,
		#[arg(long)]
		dest: InternalAsset,
	},
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
	RequestSwapDepositAddress,
	RequestSwapParameterEncoding,
	EncodeCfParameters,
}
