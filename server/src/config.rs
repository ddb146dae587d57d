use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

/// Serve a produce image classifier over HTTP
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
	/// Address to listen on
	#[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
	pub host: std::net::IpAddr,

	/// Port to listen on
	#[arg(long, env = "PORT", default_value_t = 5000)]
	pub port: u16,

	/// Path to the ONNX classification model
	#[arg(long, env = "MODEL_PATH", default_value = "model/produce-classifier.onnx")]
	pub model_path: PathBuf,

	/// Maximum number of images classified at the same time
	#[arg(long, env = "MAX_CONCURRENCY", default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
	pub max_concurrency: u32,

	/// Seconds a single classification may take before it is abandoned
	#[arg(long, env = "INFERENCE_TIMEOUT", default_value_t = 30)]
	pub inference_timeout: u64,

	/// Maximum accepted request body size, in bytes
	#[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = 10 * 1024 * 1024)]
	pub max_upload_bytes: usize,

	/// Print the OpenAPI document and exit
	#[arg(long)]
	pub dump_schema_and_exit: bool,
}

impl Config {
	#[must_use]
	pub const fn addr(&self) -> SocketAddr {
		SocketAddr::new(self.host, self.port)
	}

	#[must_use]
	pub const fn inference_timeout(&self) -> Duration {
		Duration::from_secs(self.inference_timeout)
	}

	#[must_use]
	pub const fn max_concurrency(&self) -> usize {
		self.max_concurrency as usize
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_documented_surface() {
		let config = Config::try_parse_from(["produce-server"]).unwrap();

		assert_eq!(config.addr().to_string(), "0.0.0.0:5000");
		assert_eq!(config.model_path, PathBuf::from("model/produce-classifier.onnx"));
		assert_eq!(config.max_concurrency(), 4);
		assert_eq!(config.inference_timeout(), Duration::from_secs(30));
		assert!(!config.dump_schema_and_exit);
	}

	#[test]
	fn flags_override_defaults() {
		let config = Config::try_parse_from([
			"produce-server",
			"--port",
			"8080",
			"--model-path",
			"/models/veg.onnx",
			"--max-concurrency",
			"2",
			"--dump-schema-and-exit",
		])
		.unwrap();

		assert_eq!(config.port, 8080);
		assert_eq!(config.model_path, PathBuf::from("/models/veg.onnx"));
		assert_eq!(config.max_concurrency(), 2);
		assert!(config.dump_schema_and_exit);
	}

	#[test]
	fn rejects_zero_concurrency() {
		assert!(Config::try_parse_from(["produce-server", "--max-concurrency", "0"]).is_err());
	}
}
