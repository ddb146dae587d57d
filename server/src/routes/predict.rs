use aide::axum::{routing::post, ApiRouter};
use axum::Extension;
use axum_jsonschema::Json;
use produce_core::http::PredictionResponse;
use tracing::Instrument;
use uuid::Uuid;

use crate::{errors::HTTPError, helpers::multipart::ImageUpload, runner::Runner};

pub fn handler() -> ApiRouter {
	ApiRouter::new().api_route("/predict", post(predict))
}

async fn predict(
	Extension(runner): Extension<Runner>,
	upload: ImageUpload,
) -> Result<Json<PredictionResponse>, HTTPError> {
	let span = tracing::info_span!("predict", request_id = %Uuid::new_v4());

	async move {
		tracing::debug!(
			"Received file: {:?} ({} bytes, {} detected, {:?} declared)",
			upload.file_name,
			upload.bytes.len(),
			tree_magic_mini::from_u8(&upload.bytes),
			upload.content_type,
		);

		match runner.run(upload.bytes.to_vec()).await {
			Ok(response) => {
				tracing::info!(
					"Classified image as {} ({:.2}%)",
					response.prediction,
					response.confidence
				);
				Ok(Json(response))
			},
			Err(error) => {
				tracing::error!("Error occurred: {error}");
				Err(error.into())
			},
		}
	}
	.instrument(span)
	.await
}
