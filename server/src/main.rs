#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use clap::Parser;
use produce_server::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	if let Err(e) = produce_server::start(Config::parse()).await {
		tracing::error!("{e:#}");
		std::process::exit(1);
	}
}
