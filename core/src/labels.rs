use std::ops::Index;

/// Produce categories, in the order the classifier emits its logits.
pub const PRODUCE_LABELS: [&str; 36] = [
	"apple",
	"banana",
	"beetroot",
	"bell pepper",
	"cabbage",
	"capsicum",
	"carrot",
	"cauliflower",
	"chilli pepper",
	"corn",
	"cucumber",
	"eggplant",
	"garlic",
	"ginger",
	"grapes",
	"jalepeno",
	"kiwi",
	"lemon",
	"lettuce",
	"mango",
	"onion",
	"orange",
	"paprika",
	"pear",
	"peas",
	"pineapple",
	"pomegranate",
	"potato",
	"raddish",
	"soy beans",
	"spinach",
	"sweetcorn",
	"sweetpotato",
	"tomato",
	"turnip",
	"watermelon",
];

/// An ordered, immutable list of class names, index-aligned with a model's output vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable(Vec<String>);

impl LabelTable {
	pub fn new<I, S>(labels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(labels.into_iter().map(Into::into).collect())
	}

	/// The 36 produce categories the bundled classifier was trained on.
	#[must_use]
	pub fn produce() -> Self {
		Self::new(PRODUCE_LABELS)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&str> {
		self.0.get(index).map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	#[must_use]
	pub fn to_vec(&self) -> Vec<String> {
		self.0.clone()
	}
}

impl Index<usize> for LabelTable {
	type Output = str;

	fn index(&self, index: usize) -> &Self::Output {
		&self.0[index]
	}
}
