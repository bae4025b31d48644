//! Classifier trait definition.

use serde::{Deserialize, Serialize};

use crate::classifier::cross_validation::CrossValidator;
use crate::classifier::model::ClassifierKind;
use crate::classifier::statistics::Statistics;
use crate::config::ClassifierConfig;
use crate::error::Result;
use crate::feature::training_set::TrainingSet;
use crate::feature::vector::FeatureVector;
use crate::feature::vocabulary::Vocabulary;
use crate::label::{Label, PerLabel};

/// Outcome of classifying one instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label.
    pub label: Label,
    /// Algorithm-specific confidence: the winning Naive Bayes score, or the
    /// Passive-Aggressive hinge loss.
    pub confidence: f64,
    /// Raw decision value the fallback band is checked against. For
    /// Passive-Aggressive this is the margin `w·x`, not the confidence.
    pub score: f64,
}

impl Prediction {
    pub fn new(label: Label, confidence: f64, score: f64) -> Self {
        Prediction {
            label,
            confidence,
            score,
        }
    }
}

/// Default label substituted for ambiguous predictions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fallback {
    pub label: Label,
    /// Predictions with `|score|` at or below this value are ambiguous.
    pub band: f64,
}

impl Default for Fallback {
    fn default() -> Self {
        Fallback {
            label: Label::NotSpam,
            band: 1.0,
        }
    }
}

impl Fallback {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Fallback {
            label: config.default_label,
            band: config.fallback_band,
        }
    }

    pub fn apply(&self, prediction: Prediction) -> Prediction {
        if prediction.score.abs() <= self.band {
            Prediction {
                label: self.label,
                ..prediction
            }
        } else {
            prediction
        }
    }
}

/// Contract shared by every trainable classifier.
///
/// Implementations own their cached training set, their statistics and
/// their learned state. Everything else (training, fallback, class balance
/// and cross-validation) is provided on top of the required methods.
pub trait Classifier: Send + Sync {
    /// Which algorithm this is.
    fn kind(&self) -> ClassifierKind;

    /// Learn from a validated training set, replacing any previous state.
    ///
    /// Implementations must leave their state untouched when this fails.
    fn fit(&mut self, training_set: TrainingSet) -> Result<()>;

    /// Predict labels for vectors aligned to [`Classifier::vocabulary`],
    /// without fallback.
    fn predict(&mut self, features: &[FeatureVector]) -> Result<Vec<Prediction>>;

    /// The cached training set. Its entries are empty after `optimize`.
    fn training_set(&self) -> &TrainingSet;

    fn statistics(&self) -> &Statistics;

    fn statistics_mut(&mut self) -> &mut Statistics;

    /// Default label used when `classify` is asked to fall back.
    fn fallback(&self) -> Fallback;

    /// Drop cached state to shrink the persisted model.
    fn optimize(&mut self, history_length: usize);

    /// The frozen vocabulary of the trained model.
    fn vocabulary(&self) -> &Vocabulary {
        self.training_set().vocabulary()
    }

    /// Validate the set, record its size and fit.
    fn train(&mut self, training_set: TrainingSet) -> Result<()> {
        training_set.validate()?;
        let total = training_set.len();
        self.fit(training_set)?;
        self.statistics_mut().total = total;
        Ok(())
    }

    /// Predict labels, substituting the default label for ambiguous
    /// predictions when `use_default` is set.
    fn classify(&mut self, features: &[FeatureVector], use_default: bool) -> Result<Vec<Prediction>> {
        let predictions = self.predict(features)?;
        if !use_default {
            return Ok(predictions);
        }
        let fallback = self.fallback();
        Ok(predictions.into_iter().map(|p| fallback.apply(p)).collect())
    }

    /// Fraction of the cached entries carrying each label.
    fn classes_balance(&self) -> Result<PerLabel<f64>> {
        self.training_set().classes_balance()
    }

    /// Cross-validate over the cached entries and record the result.
    fn cross_validate(&mut self, num_folds: usize, stratified: bool) -> Result<Statistics>
    where
        Self: Clone + Sized,
    {
        let validator = CrossValidator::new(num_folds).with_stratified(stratified);
        self.cross_validate_with(&validator)
    }

    /// Cross-validate with an explicit validator and record the result.
    fn cross_validate_with(&mut self, validator: &CrossValidator) -> Result<Statistics>
    where
        Self: Clone + Sized,
    {
        let outcome = validator.evaluate(self, self.training_set())?;

        let statistics = self.statistics_mut();
        statistics.asserts = outcome.asserts();
        statistics.evaluated = outcome.evaluated();
        statistics.assertion_ratio = outcome.assertion_ratio();
        statistics.deviation = outcome.deviation();
        statistics.fold_accuracies = outcome.accuracies();

        Ok(statistics.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_band() {
        let fallback = Fallback::default();

        let ambiguous = fallback.apply(Prediction::new(Label::Spam, 0.7, 0.7));
        assert_eq!(ambiguous.label, Label::NotSpam);
        assert_eq!(ambiguous.confidence, 0.7);

        let edge = fallback.apply(Prediction::new(Label::Spam, 1.0, -1.0));
        assert_eq!(edge.label, Label::NotSpam);

        let confident = fallback.apply(Prediction::new(Label::Spam, 4.0, 4.0));
        assert_eq!(confident.label, Label::Spam);
    }
}
