//! Feature extraction and vocabulary alignment.

pub mod extractor;
pub mod training_set;
pub mod vector;
pub mod vocabulary;

pub use self::extractor::FeatureExtractor;
pub use self::training_set::{LabeledDocument, TrainingEntry, TrainingSet, TrainingSetBuilder};
pub use self::vector::FeatureVector;
pub use self::vocabulary::Vocabulary;
