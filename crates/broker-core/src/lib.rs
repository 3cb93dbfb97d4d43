//! The broker client.
//!
//! [`BrokerClient`] runs every call the same way: the intent is checked and
//! assembled into a request, the request is sent through the configured
//! transport, and the reply is decoded. Nothing reaches the transport unless
//! the whole request was assembled successfully.

use broker_address::AddressValidator;
use broker_codec::{
	BrokerRequest, CfParametersRequest, DepositAddressRequest, DepositChannel,
	ParameterEncodingRequest, VaultSwapData,
};
use broker_config::BrokerConfig;
use broker_rpc::{RpcInterface, RpcService, TransportError};
use broker_types::{AddressRole, BrokerError, ChainflipNetwork, Result, SwapIntent};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ClientError {
	#[error("Configuration error: {0}")]
	Config(String),
}

pub struct BrokerClient {
	rpc: RpcService,
	validator: AddressValidator,
	broker_account: Option<String>,
}

impl BrokerClient {
	/// Creates a client for `network`.
	///
	/// With a `broker_account`, parameter encoding and CF parameter requests
	/// are routed through a node on behalf of that account.
	pub fn new(
		rpc: RpcService,
		network: ChainflipNetwork,
		broker_account: Option<String>,
	) -> Result<Self> {
		let validator = AddressValidator::new(network);
		if let Some(account) = &broker_account {
			validator.validate_chainflip_account(account, AddressRole::BrokerAccount)?;
		}

		Ok(Self {
			rpc,
			validator,
			broker_account,
		})
	}

	pub fn network(&self) -> ChainflipNetwork {
		self.validator.network()
	}

	pub fn broker_account(&self) -> Option<&str> {
		self.broker_account.as_deref()
	}

	pub fn deposit_address_request(&self, intent: &SwapIntent) -> Result<DepositAddressRequest> {
		DepositAddressRequest::assemble(intent, &self.validator)
	}

	pub fn parameter_encoding_request(&self, intent: &SwapIntent) -> Result<ParameterEncodingRequest> {
		let request = ParameterEncodingRequest::assemble(intent, &self.validator)?;
		match &self.broker_account {
			Some(account) => request.with_broker_account(account),
			None => Ok(request),
		}
	}

	pub fn cf_parameters_request(&self, intent: &SwapIntent) -> Result<CfParametersRequest> {
		let request = CfParametersRequest::assemble(intent, &self.validator)?;
		match &self.broker_account {
			Some(account) => request.with_broker_account(account),
			None => Ok(request),
		}
	}

	/// Opens a deposit channel for the swap.
	pub async fn request_swap_deposit_address(&self, intent: &SwapIntent) -> Result<DepositChannel> {
		let request = self.deposit_address_request(intent)?;
		let channel = self.send(&request).await?;
		info!(
			deposit_channel_id = %channel.deposit_channel_id,
			address = %channel.address,
			"Opened deposit channel"
		);
		Ok(channel)
	}

	/// Fetches the transaction data for a vault swap.
	pub async fn request_swap_parameter_encoding(&self, intent: &SwapIntent) -> Result<VaultSwapData> {
		let request = self.parameter_encoding_request(intent)?;
		self.send(&request).await
	}

	/// Fetches the encoded swap parameters for a contract call.
	pub async fn encode_cf_parameters(&self, intent: &SwapIntent) -> Result<String> {
		let request = self.cf_parameters_request(intent)?;
		self.send(&request).await
	}

	/// Sends an assembled request and decodes its reply.
	pub async fn send<R: BrokerRequest>(&self, request: &R) -> Result<R::Response> {
		let method = request.method();
		let params = request.params()?;
		info!(method, params = params.len(), "Sending broker request");

		let result = self.rpc.call(method, params).await.map_err(|e| {
			warn!(method, error = %e, "Broker request failed");
			BrokerError::from(e)
		})?;

		let response = request.decode_response(result)?;
		debug!(method, "Decoded broker reply");
		Ok(response)
	}
}

// Type alias for the transport factory
type TransportFactory =
	Box<dyn Fn(&toml::Value) -> std::result::Result<Box<dyn RpcInterface>, TransportError> + Send>;

/// Builds a [`BrokerClient`] from configuration.
pub struct BrokerClientBuilder {
	config: BrokerConfig,
	transport_factory: Option<TransportFactory>,
}

impl BrokerClientBuilder {
	pub fn new(config: BrokerConfig) -> Self {
		Self {
			config,
			transport_factory: None,
		}
	}

	pub fn with_transport_factory<F>(mut self, factory: F) -> Self
	where
		F: Fn(&toml::Value) -> std::result::Result<Box<dyn RpcInterface>, TransportError>
			+ Send
			+ 'static,
	{
		self.transport_factory = Some(Box::new(factory));
		self
	}

	pub fn build(self) -> std::result::Result<BrokerClient, ClientError> {
		let factory = self
			.transport_factory
			.ok_or_else(|| ClientError::Config("Transport factory not provided".into()))?;

		let transport = factory(&self.config.rpc.to_table())
			.map_err(|e| ClientError::Config(e.to_string()))?;
		info!(
			network = %self.config.broker.network,
			url = %self.config.rpc.url,
			node_routing = self.config.rpc.broker_account.is_some(),
			"Broker client configured"
		);

		BrokerClient::new(
			RpcService::new(transport),
			self.config.broker.network,
			self.config.rpc.broker_account,
		)
		.map_err(|e| ClientError::Config(e.to_string()))
	}
}
