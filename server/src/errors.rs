use aide::{
	gen::GenContext,
	openapi::{Operation, Response as ApiResponse},
	OperationOutput,
};
use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use produce_core::http::ErrorResponse;

use crate::runner::Error as RunnerError;

#[derive(Debug)]
pub struct HTTPError {
	detail: String,
	status_code: StatusCode,
}

impl HTTPError {
	pub fn new(detail: &str) -> Self {
		Self {
			detail: detail.into(),
			status_code: StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub const fn with_status(mut self, status_code: StatusCode) -> Self {
		self.status_code = status_code;
		self
	}
}

impl IntoResponse for HTTPError {
	fn into_response(self) -> Response {
		(self.status_code, Json(ErrorResponse::new(self.detail))).into_response()
	}
}

impl OperationOutput for HTTPError {
	type Inner = Self;

	fn inferred_responses(
		ctx: &mut GenContext,
		operation: &mut Operation,
	) -> Vec<(Option<u16>, ApiResponse)> {
		axum_jsonschema::Json::<ErrorResponse>::operation_response(ctx, operation)
			.map(|res| vec![(Some(400), res.clone()), (Some(500), res)])
			.unwrap_or_default()
	}
}

impl From<RunnerError> for HTTPError {
	fn from(e: RunnerError) -> Self {
		Self::new(&e.to_string()).with_status(StatusCode::INTERNAL_SERVER_ERROR)
	}
}
