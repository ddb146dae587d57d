use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scores::Classification;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassConfidence {
	/// Category name
	#[serde(rename = "class")]
	pub label: String,
	/// Probability of this category, in percent
	pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResponse {
	pub success: bool,
	/// Most likely category
	pub prediction: String,
	/// Confidence of the prediction, in percent, rounded to two decimals
	pub confidence: f64,
	/// The image the model saw, as a PNG data URL
	pub image: String,
	/// Every category, most likely first
	pub all_predictions: Vec<ClassConfidence>,
}

impl PredictionResponse {
	#[must_use]
	pub fn new(classification: Classification, image: String) -> Self {
		Self {
			success: true,
			confidence: round_to_hundredths(classification.confidence),
			prediction: classification.label,
			all_predictions: classification.rankings,
			image,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
	pub error: String,
	pub success: bool,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			success: false,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
	/// Service status
	pub status: String,
	/// Whether the classifier is loaded into memory
	pub model_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoriesResponse {
	/// Every category the model can predict, in output order
	pub categories: Vec<String>,
}

#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn class_confidence_uses_class_key() {
		let entry = ClassConfidence {
			label: "kiwi".to_string(),
			confidence: 12.5,
		};

		assert_eq!(
			serde_json::to_value(entry).unwrap(),
			json!({ "class": "kiwi", "confidence": 12.5 })
		);
	}

	#[test]
	fn error_response_is_unsuccessful() {
		assert_eq!(
			serde_json::to_value(ErrorResponse::new("No image provided")).unwrap(),
			json!({ "error": "No image provided", "success": false })
		);
	}

	#[test]
	fn rounds_to_two_decimals() {
		assert!((round_to_hundredths(97.456_78) - 97.46).abs() < f64::EPSILON);
		assert!((round_to_hundredths(0.004) - 0.0).abs() < f64::EPSILON);
		assert!((round_to_hundredths(100.0) - 100.0).abs() < f64::EPSILON);
	}
}
