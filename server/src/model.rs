use std::path::Path;

use anyhow::{bail, Context, Result};
use produce_core::{Classifier, ImageTensor, LabelTable};
use tract_onnx::prelude::*;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Height and width of the images the produce classifier was trained on.
pub const INPUT_SIZE: (u32, u32) = (180, 180);
const CHANNELS: usize = 3;

/// An ONNX image classifier, optimized once at load time and shared across requests.
pub struct OnnxClassifier {
	plan: Plan,
	input_size: (u32, u32),
}

impl OnnxClassifier {
	/// Load and optimize the model at `path`, checking it emits one output per label.
	///
	/// # Errors
	///
	/// Returns an error if the model is missing, cannot be parsed, or its output size doesn't match `labels`.
	pub fn load(path: &Path, labels: &LabelTable) -> Result<Self> {
		tracing::debug!("Loading model from {}", path.display());
		let model = tract_onnx::onnx()
			.model_for_path(path)
			.with_context(|| format!("Failed to read model at {}", path.display()))?;

		Self::from_model(model, labels)
	}

	fn from_model(model: InferenceModel, labels: &LabelTable) -> Result<Self> {
		let (height, width) = INPUT_SIZE;

		let model = model
			.with_input_fact(
				0,
				InferenceFact::dt_shape(
					f32::datum_type(),
					tvec!(1, height as usize, width as usize, CHANNELS),
				),
			)?
			.into_optimized()
			.context("Failed to optimize model")?;

		let output = model.output_outlets()?[0];
		let fact = model.outlet_fact(output)?;
		if let Some(dims) = fact.shape.as_concrete() {
			if dims.last() != Some(&labels.len()) {
				bail!(
					"Model output shape {dims:?} doesn't match the {} known categories",
					labels.len()
				);
			}
		}

		Ok(Self {
			plan: model.into_runnable()?,
			input_size: INPUT_SIZE,
		})
	}
}

impl Classifier for OnnxClassifier {
	fn input_size(&self) -> (u32, u32) {
		self.input_size
	}

	fn forward(&self, input: ImageTensor) -> Result<Vec<f32>> {
		let [batch, height, width, channels] = input.shape();
		let tensor = tract_ndarray::Array4::from_shape_vec((batch, height, width, channels), input.into_data())?
			.into_tensor();

		let outputs = self.plan.run(tvec!(tensor.into()))?;
		let logits = outputs
			.first()
			.context("Model produced no outputs")?
			.to_array_view::<f32>()?
			.iter()
			.copied()
			.collect();

		Ok(logits)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tract_onnx::pb::{
		tensor_shape_proto::{dimension, Dimension},
		type_proto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto, TensorProto,
		TensorShapeProto, TypeProto, ValueInfoProto,
	};

	const FLOAT: i32 = 1;
	const PIXELS: usize = 180 * 180 * 3;

	fn value_info(name: &str, dims: &[i64]) -> ValueInfoProto {
		ValueInfoProto {
			name: name.to_string(),
			r#type: Some(TypeProto {
				value: Some(type_proto::Value::TensorType(type_proto::Tensor {
					elem_type: FLOAT,
					shape: Some(TensorShapeProto {
						dim: dims
							.iter()
							.map(|&d| Dimension {
								value: Some(dimension::Value::DimValue(d)),
								..Dimension::default()
							})
							.collect(),
						..TensorShapeProto::default()
					}),
					..type_proto::Tensor::default()
				})),
				..TypeProto::default()
			}),
			..ValueInfoProto::default()
		}
	}

	/// Flattens the NHWC image and multiplies it by `weights`, a `[PIXELS, outputs]` matrix.
	fn linear_model(outputs: usize, weights: Vec<f32>) -> InferenceModel {
		let proto = ModelProto {
			ir_version: 7,
			opset_import: vec![OperatorSetIdProto {
				domain: String::new(),
				version: 13,
				..OperatorSetIdProto::default()
			}],
			graph: Some(GraphProto {
				name: "linear".to_string(),
				node: vec![
					NodeProto {
						op_type: "Flatten".to_string(),
						input: vec!["image".to_string()],
						output: vec!["flat".to_string()],
						..NodeProto::default()
					},
					NodeProto {
						op_type: "MatMul".to_string(),
						input: vec!["flat".to_string(), "weights".to_string()],
						output: vec!["logits".to_string()],
						..NodeProto::default()
					},
				],
				initializer: vec![TensorProto {
					name: "weights".to_string(),
					dims: vec![PIXELS as i64, outputs as i64],
					data_type: FLOAT,
					float_data: weights,
					..TensorProto::default()
				}],
				input: vec![value_info("image", &[1, 180, 180, 3])],
				output: vec![value_info("logits", &[1, outputs as i64])],
				..GraphProto::default()
			}),
			..ModelProto::default()
		};

		tract_onnx::onnx().model_for_proto_model(&proto).unwrap()
	}

	const fn pixel(y: usize, x: usize, c: usize) -> usize {
		(y * 180 + x) * 3 + c
	}

	#[test]
	fn forward_reads_nhwc_pixels_into_logits() {
		let outputs = 36;
		let mut weights = vec![0.0; PIXELS * outputs];
		weights[pixel(0, 1, 2) * outputs + 7] = 1.0;
		weights[pixel(2, 0, 0) * outputs] = 0.5;
		weights[pixel(179, 179, 1) * outputs + 35] = 2.0;

		let classifier =
			OnnxClassifier::from_model(linear_model(outputs, weights), &LabelTable::produce()).unwrap();
		assert_eq!(classifier.input_size(), (180, 180));

		let mut data = vec![0.0; PIXELS];
		data[pixel(0, 1, 2)] = 200.0;
		data[pixel(2, 0, 0)] = 10.0;
		data[pixel(179, 179, 1)] = 3.0;
		let input = ImageTensor::new(180, 180, 3, data).unwrap();

		let logits = classifier.forward(input).unwrap();

		assert_eq!(logits.len(), 36);
		assert!((logits[7] - 200.0).abs() < 1e-3);
		assert!((logits[0] - 5.0).abs() < 1e-3);
		assert!((logits[35] - 6.0).abs() < 1e-3);
		assert!(logits
			.iter()
			.enumerate()
			.filter(|(i, _)| ![0, 7, 35].contains(i))
			.all(|(_, v)| v.abs() < 1e-6));
	}

	#[test]
	fn rejects_models_with_the_wrong_number_of_outputs() {
		let model = linear_model(10, vec![0.0; PIXELS * 10]);

		let err = OnnxClassifier::from_model(model, &LabelTable::produce())
			.err()
			.unwrap();

		assert!(
			err.to_string().contains("doesn't match the 36 known categories"),
			"unexpected error: {err}"
		);
	}

	#[test]
	fn missing_model_fails_to_load() {
		let err = OnnxClassifier::load(Path::new("does/not/exist.onnx"), &LabelTable::produce())
			.err()
			.unwrap();

		assert!(err.to_string().contains("does/not/exist.onnx"));
	}

	#[test]
	fn malformed_model_fails_to_load() {
		let path = std::env::temp_dir().join(format!("{}.onnx", uuid::Uuid::new_v4()));
		std::fs::write(&path, b"definitely not protobuf").unwrap();

		let result = OnnxClassifier::load(&path, &LabelTable::produce());
		std::fs::remove_file(&path).unwrap();

		assert!(result.is_err());
	}
}
