//! Trainable spam classifiers.
//!
//! Two algorithms share one contract, [`Classifier`]:
//!
//! - [`NaiveBayes`]: frequency-weighted class likelihoods, stateless at
//!   classification time.
//! - [`PassiveAggressive`]: an online linear learner that keeps a history of
//!   weight vectors and advances it on every update.
//!
//! [`Model`] is the closed set of concrete classifiers, built from a
//! [`ClassifierKind`]. Cross-validation lives in [`cross_validation`] and
//! works unchanged for both.

pub mod classifier;
pub mod cross_validation;
pub mod linalg;
pub mod model;
pub mod naive_bayes;
pub mod passive_aggressive;
pub mod statistics;

pub use self::classifier::{Classifier, Fallback, Prediction};
pub use self::cross_validation::{CrossValidation, CrossValidator, FoldOutcome};
pub use self::model::{ClassifierKind, Model};
pub use self::naive_bayes::NaiveBayes;
pub use self::passive_aggressive::{PassiveAggressive, WeightHistory};
pub use self::statistics::Statistics;
