use aide::{
	axum::{routing::get, ApiRouter},
	openapi::OpenApi,
};
use axum::Extension;
use axum_jsonschema::Json;
use produce_core::http::{CategoriesResponse, HealthResponse};
use schemars::JsonSchema;

use crate::runner::Runner;

pub fn handler() -> ApiRouter {
	ApiRouter::new()
		.api_route("/", get(root))
		.api_route("/health", get(health))
		.api_route("/categories", get(categories))
		.route("/openapi.json", axum::routing::get(openapi))
}

#[derive(Debug, serde::Serialize, JsonSchema)]
pub struct RootResponse {
	/// Relative URL to the OpenAPI specification
	pub openapi_url: String,
	/// Relative URL to the classification endpoint
	pub predict_url: String,
}

#[allow(clippy::unused_async)]
pub async fn root() -> Json<RootResponse> {
	Json(RootResponse {
		openapi_url: "/openapi.json".to_string(),
		predict_url: "/predict".to_string(),
	})
}

#[allow(clippy::unused_async)]
pub async fn health(Extension(runner): Extension<Runner>) -> Json<HealthResponse> {
	Json(HealthResponse {
		status: "healthy".to_string(),
		model_loaded: runner.is_loaded(),
	})
}

#[allow(clippy::unused_async)]
pub async fn categories(Extension(runner): Extension<Runner>) -> Json<CategoriesResponse> {
	Json(CategoriesResponse {
		categories: runner.labels().to_vec(),
	})
}

#[allow(clippy::unused_async)]
async fn openapi(Extension(openapi): Extension<OpenApi>) -> axum::Json<OpenApi> {
	axum::Json(openapi)
}
