use std::{sync::Arc, time::Duration};

use produce_core::{http::PredictionResponse, scores, Classification, Classifier, LabelTable};
use tokio::sync::{AcquireError, Semaphore};

use crate::{helpers::with_timing, preprocess::PreparedImage};

/// How many of the top predictions get logged for each request.
const LOGGED_PREDICTIONS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Preprocess(#[from] crate::preprocess::Error),

	#[error("Failed to run prediction: {0}")]
	Inference(anyhow::Error),

	#[error(transparent)]
	Scores(#[from] scores::Error),

	#[error("Classification timed out after {0:?}")]
	Timeout(Duration),

	#[error("Runner is shutting down")]
	Closed(#[from] AcquireError),

	#[error("Classification task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
}

/// Runs classifications against a shared model, bounding how many run at once.
#[derive(Clone)]
pub struct Runner {
	labels: Arc<LabelTable>,
	classifier: Arc<dyn Classifier>,
	permits: Arc<Semaphore>,
	timeout: Duration,
}

impl Runner {
	pub fn new(
		classifier: Arc<dyn Classifier>,
		labels: LabelTable,
		max_concurrency: usize,
		timeout: Duration,
	) -> Self {
		Self {
			classifier,
			timeout,
			labels: Arc::new(labels),
			permits: Arc::new(Semaphore::new(max_concurrency)),
		}
	}

	pub fn labels(&self) -> &LabelTable {
		&self.labels
	}

	pub const fn is_loaded(&self) -> bool {
		// The classifier is loaded before a runner can exist.
		true
	}

	/// Decode, classify and render a single uploaded image.
	///
	/// # Errors
	///
	/// Returns an error if the image cannot be decoded, the model fails or times out.
	pub async fn run(&self, bytes: Vec<u8>) -> Result<PredictionResponse, Error> {
		let permit = self.permits.clone().acquire_owned().await?;
		let classifier = self.classifier.clone();
		let labels = self.labels.clone();
		let span = tracing::Span::current();

		let task = tokio::task::spawn_blocking(move || {
			let _permit = permit;
			let _span = span.enter();
			classify(classifier.as_ref(), &labels, &bytes)
		});

		let (classification, image) = tokio::time::timeout(self.timeout, task)
			.await
			.map_err(|_| Error::Timeout(self.timeout))???;

		tracing::debug!(
			"Predicted: {} with {:.2}% confidence",
			classification.label,
			classification.confidence
		);
		tracing::debug!(
			"Top {LOGGED_PREDICTIONS} predictions: {:?}",
			classification.top(LOGGED_PREDICTIONS).collect::<Vec<_>>()
		);

		Ok(PredictionResponse::new(classification, image))
	}
}

fn classify(
	classifier: &dyn Classifier,
	labels: &LabelTable,
	bytes: &[u8],
) -> Result<(Classification, String), Error> {
	let image = PreparedImage::decode(bytes, classifier.input_size())?;
	let tensor = image.to_tensor()?;
	tracing::debug!("Batch shape: {:?}", tensor.shape());

	let (logits, predict_time) = with_timing(|| classifier.forward(tensor));
	let logits = logits.map_err(Error::Inference)?;
	tracing::debug!("Inference took {predict_time:?}");

	let classification = Classification::from_logits(&logits, labels)?;

	Ok((classification, image.to_dataurl()?))
}
