//! # Scutum
//!
//! A spam classification engine for short text comments.
//!
//! ## Features
//!
//! - Regex-driven comment analysis with URL counting
//! - Vocabulary building with frequency pruning
//! - Naive Bayes and Passive-Aggressive (PA, PA-I, PA-II) classifiers
//! - Online learning with a bounded, rollback-capable weight history
//! - Stratified k-fold cross-validation, optionally parallel
//! - Versioned, checksummed model envelopes in memory or on disk

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod feature;
pub mod label;
pub mod report;
pub mod store;

pub mod prelude {
    pub use crate::classifier::{Classifier, ClassifierKind, Model, Prediction};
    pub use crate::config::ScutumConfig;
    pub use crate::engine::{Classification, ClassifyRequest, SpamFilter};
    pub use crate::error::{Result, ScutumError};
    pub use crate::feature::{FeatureExtractor, LabeledDocument, TrainingSetBuilder};
    pub use crate::label::Label;
    pub use crate::store::{FileModelStore, MemoryModelStore, ModelKey, ModelStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
