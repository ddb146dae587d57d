use itertools::Itertools;

pub use crate::http::ClassConfidence;
use crate::labels::LabelTable;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
	#[error("Model produced {actual} outputs, expected one per category ({expected})")]
	OutputSize { expected: usize, actual: usize },
}

/// The outcome of a single forward pass, mapped onto a label table.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
	/// Label with the highest probability.
	pub label: String,
	/// Probability of `label`, in percent.
	pub confidence: f64,
	/// Every label, ordered by descending probability.
	pub rankings: Vec<ClassConfidence>,
}

impl Classification {
	/// Turn raw logits into a ranked probability distribution over `labels`.
	///
	/// # Errors
	///
	/// Returns an error if the number of logits doesn't match the number of labels.
	pub fn from_logits(logits: &[f32], labels: &LabelTable) -> Result<Self, Error> {
		if logits.len() != labels.len() || labels.is_empty() {
			return Err(Error::OutputSize {
				expected: labels.len(),
				actual: logits.len(),
			});
		}

		let probabilities = softmax(logits);
		let index = argmax(&probabilities).ok_or(Error::OutputSize {
			expected: labels.len(),
			actual: logits.len(),
		})?;

		// Stable sort, so ties keep label order and the argmax stays in front.
		let rankings = labels
			.iter()
			.zip(&probabilities)
			.map(|(label, probability)| ClassConfidence {
				label: label.to_string(),
				confidence: f64::from(*probability) * 100.0,
			})
			.sorted_by(|a, b| b.confidence.total_cmp(&a.confidence))
			.collect::<Vec<_>>();

		Ok(Self {
			label: labels[index].to_string(),
			confidence: f64::from(probabilities[index]) * 100.0,
			rankings,
		})
	}

	pub fn top(&self, n: usize) -> impl Iterator<Item = &ClassConfidence> {
		self.rankings.iter().take(n)
	}
}

/// Numerically stable softmax.
#[must_use]
pub fn softmax(logits: &[f32]) -> Vec<f32> {
	let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
	let exps = logits.iter().map(|v| (v - max).exp()).collect::<Vec<_>>();
	let sum: f32 = exps.iter().sum();

	exps.into_iter().map(|v| v / sum).collect()
}

/// Index of the largest value, preferring the first on ties.
#[must_use]
pub fn argmax(values: &[f32]) -> Option<usize> {
	values
		.iter()
		.enumerate()
		.fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
			Some((_, b)) if b >= v => best,
			_ => Some((i, v)),
		})
		.map(|(i, _)| i)
}
