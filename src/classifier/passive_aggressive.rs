//! Passive-Aggressive online classifier.
//!
//! The classifier keeps every weight vector it has produced, `w₀ … wₜ`,
//! over the model vocabulary. An update at step `t` scores the instance
//! with `wₜ`, measures the hinge loss and commits `wₜ₊₁`, discarding any
//! later snapshots. Training replays the corpus as steps `0 … n-1`;
//! classification is an update without a true label on the latest step,
//! so every classified instance advances the history.

use serde::{Deserialize, Serialize};

use crate::classifier::classifier::{Classifier, Fallback, Prediction};
use crate::classifier::linalg::{dot, norm};
use crate::classifier::model::ClassifierKind;
use crate::classifier::statistics::Statistics;
use crate::config::{PaVariant, PassiveAggressiveConfig};
use crate::error::{Result, ScutumError};
use crate::feature::training_set::TrainingSet;
use crate::feature::vector::FeatureVector;
use crate::label::Label;

/// Ordered weight snapshots, indexed by training step.
///
/// After pruning, the oldest retained snapshot keeps its original step
/// number, so indices stay stable across `optimize` and persistence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightHistory {
    /// Step number of `snapshots[0]`.
    offset: usize,
    snapshots: Vec<Vec<f64>>,
}

impl WeightHistory {
    /// A history holding only the zero vector `w₀`.
    pub fn new(dimension: usize) -> Self {
        WeightHistory {
            offset: 0,
            snapshots: vec![vec![0.0; dimension]],
        }
    }

    /// Oldest retained step.
    pub fn oldest_step(&self) -> usize {
        self.offset
    }

    /// Most recent step.
    pub fn latest_step(&self) -> usize {
        self.offset + self.snapshots.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Weights at `step`.
    pub fn weights(&self, step: usize) -> Result<&[f64]> {
        if self.snapshots.is_empty() {
            return Err(ScutumError::EmptyModel);
        }
        if step < self.offset {
            return Err(ScutumError::StaleStepIndex {
                requested: step,
                oldest: self.offset,
            });
        }
        self.snapshots
            .get(step - self.offset)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                ScutumError::invalid_argument(format!(
                    "step {step} is beyond the latest step {}",
                    self.latest_step()
                ))
            })
    }

    pub fn latest(&self) -> Option<&[f64]> {
        self.snapshots.last().map(Vec::as_slice)
    }

    /// Store `weights` as the snapshot following `step`, dropping any
    /// snapshot after `step`.
    fn commit(&mut self, step: usize, weights: Vec<f64>) {
        self.snapshots.truncate(step - self.offset + 1);
        self.snapshots.push(weights);
    }

    /// Keep only the most recent `keep` snapshots (at least one).
    pub fn prune(&mut self, keep: usize) {
        let keep = keep.max(1);
        if self.snapshots.len() > keep {
            let dropped = self.snapshots.len() - keep;
            self.snapshots.drain(..dropped);
            self.offset += dropped;
        }
    }

    /// Iterate `(step, weights)` from oldest to latest.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.snapshots
            .iter()
            .enumerate()
            .map(move |(i, weights)| (self.offset + i, weights.as_slice()))
    }
}

/// Passive-Aggressive spam classifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PassiveAggressive {
    config: PassiveAggressiveConfig,
    fallback: Fallback,
    training_set: TrainingSet,
    statistics: Statistics,
    history: WeightHistory,
}

impl PassiveAggressive {
    pub fn new() -> Self {
        Self::with_config(PassiveAggressiveConfig::default())
    }

    pub fn with_config(config: PassiveAggressiveConfig) -> Self {
        PassiveAggressive {
            config,
            ..Default::default()
        }
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Start from an explicit training set and weight history.
    pub fn from_parts(
        config: PassiveAggressiveConfig,
        training_set: TrainingSet,
        history: WeightHistory,
    ) -> Result<Self> {
        if let Some(weights) = history.latest() {
            if weights.len() != training_set.vocabulary().len() {
                return Err(ScutumError::DimensionMismatch {
                    left: weights.len(),
                    right: training_set.vocabulary().len(),
                });
            }
        }
        Ok(PassiveAggressive {
            config,
            training_set,
            history,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &PassiveAggressiveConfig {
        &self.config
    }

    pub fn history(&self) -> &WeightHistory {
        &self.history
    }

    /// Weights of `step` paired with vocabulary names.
    pub fn weights_at(&self, step: usize) -> Result<Vec<(String, f64)>> {
        let weights = self.history.weights(step)?;
        Ok(self
            .vocabulary()
            .label_values(weights)
            .map(|(name, weight)| (name.to_string(), weight))
            .collect())
    }

    /// Core update rule.
    ///
    /// Scores `features` with the weights at `step` (latest when `None`),
    /// treats the prediction as ground truth when `label` is `None`, and
    /// commits the next snapshot. Nothing changes when this fails.
    pub fn update(
        &mut self,
        features: &FeatureVector,
        label: Option<Label>,
        step: Option<usize>,
    ) -> Result<Prediction> {
        let step = step.unwrap_or_else(|| self.history.latest_step());
        let (prediction, next) = self.next_weights(features, label, step)?;
        self.history.commit(step, next);
        Ok(prediction)
    }

    /// Replay one training instance at `step`.
    pub fn train_step(
        &mut self,
        features: &FeatureVector,
        label: Label,
        step: usize,
    ) -> Result<Prediction> {
        self.update(features, Some(label), Some(step))
    }

    /// Classify one instance, learning from the prediction itself.
    pub fn predict_online(&mut self, features: &FeatureVector) -> Result<Prediction> {
        self.update(features, None, None)
    }

    fn next_weights(
        &self,
        features: &FeatureVector,
        label: Option<Label>,
        step: usize,
    ) -> Result<(Prediction, Vec<f64>)> {
        let weights = self.history.weights(step)?;
        let x = self.dense(features)?;

        let score = dot(weights, &x)?;
        let predicted = Label::from_score(score);
        let truth = label.unwrap_or(predicted);

        let loss = (1.0 - truth.sign() * score).max(0.0);
        let norm = match norm(&x)? {
            n if n == 0.0 => 1.0,
            n => n,
        };
        let tau = self.step_size(loss, norm);

        let scale = if self.config.signed_updates {
            truth.sign() * tau
        } else {
            loss * tau
        };
        let next = weights
            .iter()
            .zip(&x)
            .map(|(w, v)| w + scale * v)
            .collect();

        Ok((Prediction::new(predicted, loss, score), next))
    }

    /// Lay `features` out in vocabulary order. Absent features are 0;
    /// features outside the vocabulary are rejected.
    fn dense(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let vocabulary = self.training_set.vocabulary();
        let mut x = vec![0.0; vocabulary.len()];
        for (name, frequency) in features.iter() {
            let position = vocabulary.position(name).ok_or_else(|| {
                ScutumError::invalid_argument(format!("feature '{name}' is not in the vocabulary"))
            })?;
            x[position] = f64::from(frequency);
        }
        Ok(x)
    }

    fn step_size(&self, loss: f64, norm: f64) -> f64 {
        let squared = norm * norm;
        let c = self.config.aggressiveness;
        match self.config.variant {
            PaVariant::Pa => loss / squared,
            PaVariant::Pa1 => (loss / squared).min(c),
            PaVariant::Pa2 => loss / (squared + 1.0 / (2.0 * c)),
        }
    }
}

impl Classifier for PassiveAggressive {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::PassiveAggressive
    }

    fn fit(&mut self, training_set: TrainingSet) -> Result<()> {
        let mut learner = PassiveAggressive {
            config: self.config.clone(),
            fallback: self.fallback,
            history: WeightHistory::new(training_set.vocabulary().len()),
            training_set,
            statistics: Statistics::default(),
        };

        let mut mistakes = 0usize;
        for t in 0..learner.training_set.len() {
            let entry = &learner.training_set.entries()[t];
            let (features, label) = (entry.features.clone(), entry.label);
            let prediction = learner.train_step(&features, label, t)?;
            if prediction.label != label {
                mistakes += 1;
            }
        }

        log::debug!(
            "Passive-Aggressive fit on {} entries: {} online mistakes, latest step {}",
            learner.training_set.len(),
            mistakes,
            learner.history.latest_step()
        );

        self.training_set = learner.training_set;
        self.history = learner.history;
        Ok(())
    }

    fn predict(&mut self, features: &[FeatureVector]) -> Result<Vec<Prediction>> {
        let mut predictions = Vec::with_capacity(features.len());
        for x in features {
            predictions.push(self.predict_online(x)?);
        }
        Ok(predictions)
    }

    fn training_set(&self) -> &TrainingSet {
        &self.training_set
    }

    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        &mut self.statistics
    }

    fn fallback(&self) -> Fallback {
        self.fallback
    }

    fn optimize(&mut self, history_length: usize) {
        let before = self.history.len();
        self.history.prune(history_length);
        self.training_set.clear_entries();
        log::info!(
            "Pruned weight history from {} to {} snapshots (oldest step {})",
            before,
            self.history.len(),
            self.history.oldest_step()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::training_set::TrainingEntry;
    use crate::feature::vocabulary::Vocabulary;

    fn vector(values: &[(&str, u32)]) -> FeatureVector {
        values.iter().map(|&(name, value)| (name, value)).collect()
    }

    fn buy_cheap() -> PassiveAggressive {
        let vocabulary: Vocabulary = ["buy", "cheap"].into_iter().collect();
        let set = TrainingSet::new(vocabulary, Vec::new()).unwrap();
        PassiveAggressive::from_parts(
            PassiveAggressiveConfig::default(),
            set,
            WeightHistory::new(2),
        )
        .unwrap()
    }

    #[test]
    fn test_update_moves_present_features_only() {
        let mut classifier = buy_cheap();
        let x = vector(&[("buy", 2), ("cheap", 0)]);

        let prediction = classifier.train_step(&x, Label::Spam, 0).unwrap();

        // w₀·x = 0, so ŷ = spam and l = 1; τ = 1/4.
        assert_eq!(prediction.label, Label::Spam);
        assert_eq!(prediction.confidence, 1.0);
        let w1 = classifier.weights_at(1).unwrap();
        assert_eq!(w1, vec![("buy".to_string(), 0.5), ("cheap".to_string(), 0.0)]);
    }

    #[test]
    fn test_update_matches_features_by_name() {
        let mut reordered = buy_cheap();
        reordered
            .train_step(&vector(&[("cheap", 0), ("buy", 2)]), Label::Spam, 0)
            .unwrap();
        assert_eq!(
            reordered.weights_at(1).unwrap(),
            vec![("buy".to_string(), 0.5), ("cheap".to_string(), 0.0)]
        );

        let mut partial = buy_cheap();
        partial
            .train_step(&vector(&[("buy", 2)]), Label::Spam, 0)
            .unwrap();
        assert_eq!(partial.weights_at(1).unwrap(), reordered.weights_at(1).unwrap());
    }

    #[test]
    fn test_score_is_margin() {
        let mut classifier = buy_cheap();
        let x = vector(&[("buy", 2), ("cheap", 0)]);
        classifier.train_step(&x, Label::Spam, 0).unwrap();

        // w₁ = [0.5, 0]: margin 1, hinge loss 0.
        let prediction = classifier.predict_online(&x).unwrap();
        assert_eq!(prediction.score, 1.0);
        assert_eq!(prediction.confidence, 0.0);
    }

    #[test]
    fn test_replay_is_idempotent() {
        let mut classifier = buy_cheap();
        let x = vector(&[("buy", 1), ("cheap", 3)]);
        classifier.train_step(&x, Label::Spam, 0).unwrap();
        classifier.train_step(&x, Label::NotSpam, 1).unwrap();

        classifier.train_step(&x, Label::NotSpam, 1).unwrap();
        let first = classifier.history().weights(2).unwrap().to_vec();
        classifier.train_step(&x, Label::NotSpam, 1).unwrap();
        let second = classifier.history().weights(2).unwrap().to_vec();

        assert_eq!(first, second);
        assert_eq!(classifier.history().latest_step(), 2);
    }

    #[test]
    fn test_rollback_discards_later_snapshots() {
        let mut classifier = buy_cheap();
        let x = vector(&[("buy", 1), ("cheap", 1)]);
        for t in 0..4 {
            classifier.train_step(&x, Label::Spam, t).unwrap();
        }
        assert_eq!(classifier.history().latest_step(), 4);

        classifier.train_step(&x, Label::NotSpam, 1).unwrap();
        assert_eq!(classifier.history().latest_step(), 2);
    }

    #[test]
    fn test_failed_update_leaves_history_unchanged() {
        let mut classifier = buy_cheap();
        let x = vector(&[("buy", 1), ("cheap", 1)]);
        classifier.train_step(&x, Label::Spam, 0).unwrap();
        let before = classifier.history().clone();

        let unknown = vector(&[("foo", 2), ("bar", 0)]);
        assert!(classifier.predict_online(&unknown).is_err());
        assert!(classifier.train_step(&unknown, Label::Spam, 1).is_err());
        assert!(classifier.train_step(&x, Label::Spam, 7).is_err());
        assert_eq!(classifier.history(), &before);
    }

    #[test]
    fn test_zero_vector_uses_unit_norm() {
        let mut classifier = buy_cheap();
        let x = vector(&[("buy", 0), ("cheap", 0)]);

        let prediction = classifier.predict_online(&x).unwrap();

        assert_eq!(prediction.label, Label::Spam);
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(classifier.history().latest().unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_step_size_variants() {
        let mut config = PassiveAggressiveConfig {
            variant: PaVariant::Pa1,
            aggressiveness: 0.1,
            signed_updates: false,
        };
        let classifier = PassiveAggressive::with_config(config.clone());
        assert_eq!(classifier.step_size(1.0, 1.0), 0.1);

        config.variant = PaVariant::Pa2;
        config.aggressiveness = 1.0;
        let classifier = PassiveAggressive::with_config(config);
        assert_eq!(classifier.step_size(1.0, 1.0), 1.0 / 1.5);

        let classifier = PassiveAggressive::new();
        assert_eq!(classifier.step_size(1.0, 2.0), 0.25);
    }

    #[test]
    fn test_signed_updates_push_towards_not_spam() {
        let vocabulary: Vocabulary = ["buy", "cheap"].into_iter().collect();
        let set = TrainingSet::new(vocabulary, Vec::new()).unwrap();
        let config = PassiveAggressiveConfig {
            signed_updates: true,
            ..Default::default()
        };
        let mut classifier =
            PassiveAggressive::from_parts(config, set, WeightHistory::new(2)).unwrap();

        classifier
            .train_step(&vector(&[("buy", 0), ("cheap", 1)]), Label::NotSpam, 0)
            .unwrap();

        assert!(classifier.history().weights(1).unwrap()[1] < 0.0);
    }

    #[test]
    fn test_optimize_prunes_and_reports_stale_steps() {
        let vocabulary: Vocabulary = ["buy", "cheap"].into_iter().collect();
        let entries = (0..5)
            .map(|i| TrainingEntry {
                label: if i % 2 == 0 { Label::Spam } else { Label::NotSpam },
                features: vector(&[("buy", i), ("cheap", 1)]),
            })
            .collect();
        let mut classifier = PassiveAggressive::new();
        classifier
            .train(TrainingSet::new(vocabulary, entries).unwrap())
            .unwrap();
        assert_eq!(classifier.history().len(), 6);

        classifier.optimize(2);

        assert_eq!(classifier.history().len(), 2);
        assert_eq!(classifier.history().oldest_step(), 4);
        assert_eq!(classifier.history().latest_step(), 5);
        assert!(classifier.training_set().is_empty());

        let x = vector(&[("buy", 1), ("cheap", 1)]);
        assert!(matches!(
            classifier.train_step(&x, Label::Spam, 3),
            Err(ScutumError::StaleStepIndex {
                requested: 3,
                oldest: 4
            })
        ));
        classifier.predict_online(&x).unwrap();
        assert_eq!(classifier.history().latest_step(), 6);
    }

    #[test]
    fn test_classify_advances_history() {
        let mut classifier = buy_cheap();
        let batch = vec![vector(&[("buy", 1), ("cheap", 0)]); 3];

        let predictions = classifier.classify(&batch, false).unwrap();

        assert_eq!(predictions.len(), 3);
        assert_eq!(classifier.history().latest_step(), 3);
    }
}
