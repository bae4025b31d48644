//! Error types for the Scutum library.
//!
//! All errors are represented by the [`ScutumError`] enum. The domain variants
//! mirror the failure points of the classification engine (malformed training
//! sets, vector shape mismatches, stale rollback requests, missing models);
//! the remaining variants wrap I/O, serialization and configuration problems.
//!
//! # Examples
//!
//! ```
//! use scutum::error::{Result, ScutumError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ScutumError::invalid_argument("fold count must be at least 2"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Scutum operations.
#[derive(Error, Debug)]
pub enum ScutumError {
    /// The training input is not a well-formed training set.
    #[error("Invalid training set: {0}")]
    InvalidTrainingSet(String),

    /// Training was requested on zero documents.
    #[error("Empty corpus: at least one document is required")]
    EmptyCorpus,

    /// Two vectors of unequal length met in a dot or inner product.
    #[error("Dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// A norm was requested on an empty vector.
    #[error("Norm requested on an empty vector")]
    EmptyVector,

    /// No model is stored under the requested key.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rollback requested to a step older than the retained weight history.
    #[error("Stale step index {requested}: oldest retained step is {oldest}")]
    StaleStepIndex { requested: usize, oldest: usize },

    /// Class balance requested before any entries were loaded.
    #[error("Empty model: train the classifier first")]
    EmptyModel,

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with ScutumError.
pub type Result<T> = std::result::Result<T, ScutumError>;

impl ScutumError {
    /// Create a new invalid training set error.
    pub fn invalid_training_set<S: Into<String>>(msg: S) -> Self {
        ScutumError::InvalidTrainingSet(msg.into())
    }

    /// Create a new model not found error.
    pub fn model_not_found<S: Into<String>>(key: S) -> Self {
        ScutumError::ModelNotFound(key.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ScutumError::Analysis(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        ScutumError::Storage(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        ScutumError::SerializationError(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        ScutumError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ScutumError::Other(format!("Invalid argument: {}", msg.into()))
    }
}

impl From<bincode::Error> for ScutumError {
    fn from(err: bincode::Error) -> Self {
        ScutumError::SerializationError(err.to_string())
    }
}
