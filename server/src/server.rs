use std::sync::Arc;

use aide::openapi::{self, OpenApi};
use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, Extension, Router, Server};
use produce_core::{Classifier, LabelTable};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, model::OnnxClassifier, routes, runner::Runner, shutdown::Shutdown};

/// Load the model and serve it until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the model cannot be loaded or the server fails to bind.
pub async fn start(config: Config) -> Result<()> {
	if config.dump_schema_and_exit {
		let (_, openapi) = build_api();
		println!("{}", serde_json::to_string(&openapi)?);
		return Ok(());
	}

	let labels = LabelTable::produce();
	let classifier = load_model(&config, labels.clone()).await?;

	let (height, width) = classifier.input_size();
	tracing::info!(
		"Model supports {} categories, image size: {width}x{height}",
		labels.len()
	);

	let runner = Runner::new(
		classifier,
		labels,
		config.max_concurrency(),
		config.inference_timeout(),
	);
	let shutdown = Shutdown::new();

	let addr = config.addr();
	tracing::info!("Starting server on {addr}...");

	Server::bind(&addr)
		.serve(router(runner, config.max_upload_bytes).into_make_service())
		.with_graceful_shutdown(shutdown.handle())
		.await?;

	tracing::info!("Server stopped");
	Ok(())
}

/// Build the HTTP application around an already-loaded runner.
pub fn router(runner: Runner, max_upload_bytes: usize) -> Router {
	let (router, openapi) = build_api();

	router
		.layer(Extension(runner))
		.layer(Extension(openapi))
		.layer(DefaultBodyLimit::max(max_upload_bytes))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
}

async fn load_model(config: &Config, labels: LabelTable) -> Result<Arc<dyn Classifier>> {
	let path = config.model_path.clone();
	tracing::info!("Loading model from {}...", path.display());

	let classifier = tokio::task::spawn_blocking(move || OnnxClassifier::load(&path, &labels))
		.await?
		.context("Failed to load classification model")?;

	tracing::info!("Model loaded successfully");
	Ok(Arc::new(classifier))
}

fn build_api() -> (Router, OpenApi) {
	let mut openapi = OpenApi {
		info: openapi::Info {
			title: "Produce Classifier".to_string(),
			version: env!("CARGO_PKG_VERSION").to_string(),
			..openapi::Info::default()
		},
		..OpenApi::default()
	};

	let router = routes::handler().finish_api(&mut openapi);

	(router, openapi)
}
