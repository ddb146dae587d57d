use aide::{
	gen::GenContext,
	openapi::{self, MediaType, Operation, ReferenceOr, RequestBody},
	operation::OperationInput,
};
use async_trait::async_trait;
use axum::{
	body::{Body, Bytes},
	extract::{multipart::MultipartError, FromRequest, Multipart},
	http::{Request, StatusCode},
};
use indexmap::indexmap;
use schemars::schema::{InstanceType, Schema, SchemaObject};

use crate::errors::HTTPError;

/// Multipart field holding the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// The `image` field of a `multipart/form-data` upload.
#[derive(Debug)]
pub struct ImageUpload {
	pub file_name: Option<String>,
	pub content_type: Option<String>,
	pub bytes: Bytes,
}

#[async_trait]
impl<S> FromRequest<S, Body> for ImageUpload
where
	S: Send + Sync,
{
	type Rejection = HTTPError;

	async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
		let Ok(mut multipart) = Multipart::from_request(req, state).await else {
			tracing::debug!("Rejecting request without a multipart body");
			return Err(missing_image());
		};

		while let Some(field) = multipart
			.next_field()
			.await
			.map_err(rejection)?
		{
			if field.name() != Some(IMAGE_FIELD) {
				continue;
			}

			let file_name = field.file_name().map(ToString::to_string);
			let content_type = field.content_type().map(ToString::to_string);
			let bytes = field.bytes().await.map_err(rejection)?;

			if bytes.is_empty() {
				continue;
			}

			return Ok(Self {
				file_name,
				content_type,
				bytes,
			});
		}

		Err(missing_image())
	}
}

fn rejection(e: MultipartError) -> HTTPError {
	HTTPError::new(&e.body_text()).with_status(e.status())
}

fn missing_image() -> HTTPError {
	HTTPError::new("No image provided").with_status(StatusCode::BAD_REQUEST)
}

impl OperationInput for ImageUpload {
	fn operation_input(_: &mut GenContext, operation: &mut Operation) {
		let mut image = SchemaObject {
			instance_type: Some(InstanceType::String.into()),
			format: Some("binary".to_string()),
			..SchemaObject::default()
		};
		image.metadata().description = Some("Image to classify".to_string());

		let mut form = SchemaObject {
			instance_type: Some(InstanceType::Object.into()),
			..SchemaObject::default()
		};
		form.object().properties.insert(IMAGE_FIELD.to_string(), image.into());
		form.object().required.insert(IMAGE_FIELD.to_string());

		operation.request_body = Some(ReferenceOr::Item(RequestBody {
			required: true,
			content: indexmap! {
				"multipart/form-data".to_string() => MediaType {
					schema: Some(openapi::SchemaObject {
						example: None,
						external_docs: None,
						json_schema: Schema::Object(form),
					}),
					..MediaType::default()
				},
			},
			..RequestBody::default()
		}));
	}
}
