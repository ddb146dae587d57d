use std::io::Cursor;

use image::{imageops::FilterType, io::Reader as ImageReader, DynamicImage, ImageOutputFormat, RgbImage};
use produce_core::{spec::ShapeError, ImageTensor};

use crate::helpers::base64_encode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read image: {0}")]
	Read(#[from] std::io::Error),

	#[error("Failed to decode image: {0}")]
	Decode(#[from] image::ImageError),

	#[error("Failed to encode image preview: {0}")]
	Encode(image::ImageError),

	#[error(transparent)]
	Shape(#[from] ShapeError),
}

/// An uploaded image, coerced to RGB and resized to the model's input size.
#[derive(Debug, Clone)]
pub struct PreparedImage {
	image: RgbImage,
}

impl PreparedImage {
	/// Decode `bytes` and resize the result to exactly `width`x`height`.
	///
	/// Aspect ratio is not preserved, the model was trained on stretched images.
	///
	/// # Errors
	///
	/// Returns an error if the bytes are not a supported image.
	pub fn decode(bytes: &[u8], (height, width): (u32, u32)) -> Result<Self, Error> {
		let image = ImageReader::new(Cursor::new(bytes))
			.with_guessed_format()?
			.decode()?;
		tracing::debug!(
			"Original image size: {}x{}, color: {:?}",
			image.width(),
			image.height(),
			image.color()
		);

		let image = image.resize_exact(width, height, FilterType::CatmullRom).into_rgb8();
		tracing::debug!("Resized to: {}x{}", image.width(), image.height());

		Ok(Self { image })
	}

	/// Lay the pixels out as a batch-of-one NHWC tensor of raw `0..=255` values.
	///
	/// # Errors
	///
	/// Returns an error if the pixel buffer doesn't match the image dimensions.
	pub fn to_tensor(&self) -> Result<ImageTensor, Error> {
		let data = self.image.as_raw().iter().map(|&v| f32::from(v)).collect();

		Ok(ImageTensor::new(
			self.image.height() as usize,
			self.image.width() as usize,
			3,
			data,
		)?)
	}

	/// Encode the prepared image as a PNG data URL.
	///
	/// # Errors
	///
	/// Returns an error if PNG encoding fails.
	pub fn to_dataurl(&self) -> Result<String, Error> {
		let mut png = Cursor::new(Vec::new());
		DynamicImage::ImageRgb8(self.image.clone())
			.write_to(&mut png, ImageOutputFormat::Png)
			.map_err(Error::Encode)?;

		Ok(format!(
			"data:image/png;base64,{}",
			base64_encode(png.into_inner())
		))
	}

	#[cfg(test)]
	pub const fn image(&self) -> &RgbImage {
		&self.image
	}
}
