//! Configuration for extraction, classifiers, cross-validation and training.
//!
//! Every section has a `Default` matching the behaviour the engine was
//! designed around, and the whole tree can be read from a JSON file:
//!
//! ```json
//! {
//!   "extraction": { "min_frequency": 3 },
//!   "classifier": { "passive_aggressive": { "variant": "pa1", "aggressiveness": 0.5 } },
//!   "cross_validation": { "folds": 5 }
//! }
//! ```
//!
//! Missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::comment::DEFAULT_MIN_TOKEN_LENGTH;
use crate::analysis::tokenizer::regex::COMMENT_SEPARATOR_PATTERN;
use crate::error::{Result, ScutumError};
use crate::label::Label;

/// Name of the synthetic feature that counts links in a document.
pub const LINKS_FEATURE: &str = "links_count";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScutumConfig {
    /// Feature extraction settings.
    pub extraction: ExtractionConfig,
    /// Classifier settings.
    pub classifier: ClassifierConfig,
    /// Cross-validation settings.
    pub cross_validation: CrossValidationConfig,
    /// Model building settings.
    pub training: TrainingConfig,
}

impl ScutumConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ScutumConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.min_token_length == 0 {
            return Err(ScutumError::invalid_config(
                "extraction.min_token_length must be positive",
            ));
        }
        if self.extraction.links_feature.is_empty() {
            return Err(ScutumError::invalid_config(
                "extraction.links_feature must not be empty",
            ));
        }
        if !(self.classifier.fallback_band >= 0.0) {
            return Err(ScutumError::invalid_config(
                "classifier.fallback_band must be non-negative",
            ));
        }
        let c = self.classifier.passive_aggressive.aggressiveness;
        if !(c > 0.0 && c.is_finite()) {
            return Err(ScutumError::invalid_config(
                "classifier.passive_aggressive.aggressiveness must be positive and finite",
            ));
        }
        if self.cross_validation.folds < 2 {
            return Err(ScutumError::invalid_config(
                "cross_validation.folds must be at least 2",
            ));
        }
        if self.training.history_length == 0 {
            return Err(ScutumError::invalid_config(
                "training.history_length must be positive",
            ));
        }
        Ok(())
    }
}

/// Feature extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Regex describing token separators.
    pub separator_pattern: String,
    /// Tokens shorter than this many characters (after folding) are ignored.
    pub min_token_length: usize,
    /// Features seen fewer times than this within one document are dropped.
    pub min_frequency: u32,
    /// Name of the synthetic link counter.
    pub links_feature: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            separator_pattern: COMMENT_SEPARATOR_PATTERN.to_string(),
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            min_frequency: 3,
            links_feature: LINKS_FEATURE.to_string(),
        }
    }
}

/// Classifier settings shared by both algorithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Label returned when a fallback-enabled prediction is ambiguous.
    pub default_label: Label,
    /// Confidence magnitude at or below which a prediction is ambiguous.
    pub fallback_band: f64,
    /// Passive-Aggressive specific settings.
    pub passive_aggressive: PassiveAggressiveConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_label: Label::NotSpam,
            fallback_band: 1.0,
            passive_aggressive: PassiveAggressiveConfig::default(),
        }
    }
}

/// Step-size rule of the Passive-Aggressive learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaVariant {
    /// τ = l / ‖x‖²
    #[default]
    Pa,
    /// τ = min(C, l / ‖x‖²)
    #[serde(alias = "pa-i")]
    Pa1,
    /// τ = l / (‖x‖² + 1 / (2C))
    #[serde(alias = "pa-ii")]
    Pa2,
}

/// Passive-Aggressive settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassiveAggressiveConfig {
    /// Which step-size rule to apply.
    pub variant: PaVariant,
    /// Aggressiveness `C`, used by PA-I and PA-II.
    pub aggressiveness: f64,
    /// Multiply updates by the true label's sign (`y·τ·x`).
    ///
    /// Off by default: stored models were trained with the unsigned
    /// `l·τ·x` rule and must keep classifying identically.
    pub signed_updates: bool,
}

impl Default for PassiveAggressiveConfig {
    fn default() -> Self {
        Self {
            variant: PaVariant::Pa,
            aggressiveness: 1.0,
            signed_updates: false,
        }
    }
}

/// Cross-validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidationConfig {
    /// Number of folds.
    pub folds: usize,
    /// Keep each label's corpus proportion inside every fold.
    pub stratified: bool,
    /// Evaluate folds on the rayon thread pool.
    pub parallel: bool,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            stratified: true,
            parallel: true,
        }
    }
}

/// Model building settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Run cross-validation before the final fit to fill in statistics.
    pub cross_validate: bool,
    /// Prune cached state after training.
    pub optimize: bool,
    /// Weight snapshots kept by `optimize`.
    pub history_length: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            cross_validate: true,
            optimize: true,
            history_length: 10,
        }
    }
}
