use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	// Initialize tracing
	setup_tracing(&args.log_level)?;

	let output = match args.command {
		Command::Price(command) => commands::price(command)?,
		Command::ValidateAddress {
			chain,
			network,
			address,
		} => commands::validate_address(chain, network, &address)?,
		Command::Encode {
			method,
			intent,
			network,
			broker_account,
		} => {
			let intent = commands::read_intent(&intent)?;
			let rendered = commands::encode(method, &intent, network, broker_account.as_deref())?;
			serde_json::to_string_pretty(&rendered)?
		}
		Command::Request { method, intent } => {
			let intent = commands::read_intent(&intent)?;
			let config = commands::read_config(args.config.as_deref())?;
			let reply = commands::request(method, &intent, config).await?;
			serde_json::to_string_pretty(&reply)?
		}
	};

	println!("{}", output);
	Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	Ok(())
}
