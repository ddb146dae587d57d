#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod http;
pub mod labels;
pub mod scores;
pub mod spec;

pub use labels::LabelTable;
pub use scores::{Classification, ClassConfidence};
pub use spec::{Classifier, ImageTensor};
