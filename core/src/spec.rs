use anyhow::Result;

/// A batch-of-one image tensor in NHWC layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
	shape: [usize; 4],
	data: Vec<f32>,
}

#[derive(Debug, thiserror::Error)]
#[error("Tensor data has {actual} values, but shape {shape:?} needs {expected}")]
pub struct ShapeError {
	shape: [usize; 4],
	expected: usize,
	actual: usize,
}

impl ImageTensor {
	/// Create a tensor from row-major pixel data.
	///
	/// # Errors
	///
	/// Returns an error if `data` doesn't hold exactly `height * width * channels` values.
	pub fn new(height: usize, width: usize, channels: usize, data: Vec<f32>) -> Result<Self, ShapeError> {
		let shape = [1, height, width, channels];
		let expected = shape.iter().product();

		if data.len() != expected {
			return Err(ShapeError {
				shape,
				expected,
				actual: data.len(),
			});
		}

		Ok(Self { shape, data })
	}

	#[must_use]
	pub const fn shape(&self) -> [usize; 4] {
		self.shape
	}

	#[must_use]
	pub fn data(&self) -> &[f32] {
		&self.data
	}

	#[must_use]
	pub fn into_data(self) -> Vec<f32> {
		self.data
	}
}

/// An image classification model
pub trait Classifier: Send + Sync {
	/// Height and width of the image the model expects.
	fn input_size(&self) -> (u32, u32);

	/// Run a forward pass, returning one raw logit per class.
	///
	/// # Errors
	///
	/// Returns an error if the model fails to run.
	fn forward(&self, input: ImageTensor) -> Result<Vec<f32>>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tensor_requires_matching_data() {
		let tensor = ImageTensor::new(2, 2, 3, vec![0.0; 12]).unwrap();
		assert_eq!(tensor.shape(), [1, 2, 2, 3]);

		let err = ImageTensor::new(2, 2, 3, vec![0.0; 11]).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Tensor data has 11 values, but shape [1, 2, 2, 3] needs 12"
		);
	}
}
