//! Naive Bayes classifier.
//!
//! The model keeps, per label, the prior probability and a likelihood score
//! for every vocabulary feature. Likelihoods are the summed feature
//! frequencies of the label's instances divided by the label's prior, not
//! by any feature count; stored models depend on that normalization.
//!
//! Scoring starts each label at 1 and multiplies in
//! `(frequency · likelihood + 1) / (prior + 1)` for every feature present in
//! the instance. The highest score wins, ties go to spam.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::classifier::{Classifier, Fallback, Prediction};
use crate::classifier::model::ClassifierKind;
use crate::classifier::statistics::Statistics;
use crate::error::Result;
use crate::feature::training_set::TrainingSet;
use crate::feature::vector::FeatureVector;
use crate::label::{Label, PerLabel};

/// Naive Bayes spam classifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayes {
    fallback: Fallback,
    training_set: TrainingSet,
    statistics: Statistics,
    priors: PerLabel<f64>,
    /// Per label, one score per vocabulary feature in vocabulary order.
    likelihoods: PerLabel<Vec<f64>>,
}

impl NaiveBayes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: Fallback) -> Self {
        NaiveBayes {
            fallback,
            ..Default::default()
        }
    }

    pub fn priors(&self) -> &PerLabel<f64> {
        &self.priors
    }

    pub fn likelihoods(&self) -> &PerLabel<Vec<f64>> {
        &self.likelihoods
    }

    /// Likelihood of one feature under one label.
    pub fn likelihood(&self, label: Label, feature: &str) -> Option<f64> {
        let position = self.training_set.vocabulary().position(feature)?;
        self.likelihoods.get(label).get(position).copied()
    }

    /// Likelihood table as `(feature, score)` pairs in vocabulary order.
    pub fn likelihood_table(&self) -> PerLabel<Vec<(String, f64)>> {
        let vocabulary = self.training_set.vocabulary();
        self.likelihoods.map(|_, values| {
            vocabulary
                .label_values(values)
                .map(|(name, value)| (name.to_string(), value))
                .collect()
        })
    }

    fn scores(&self, features: &FeatureVector) -> PerLabel<f64> {
        let vocabulary = self.training_set.vocabulary();
        let mut scores = PerLabel::from_fn(|_| 1.0);

        for (name, frequency) in features.iter().filter(|(_, f)| *f > 0) {
            let Some(position) = vocabulary.position(name) else {
                continue;
            };
            let frequency = f64::from(frequency);
            for label in Label::ALL {
                let likelihood = self.likelihoods.get(label).get(position).copied().unwrap_or(0.0);
                let prior = *self.priors.get(label);
                *scores.get_mut(label) *= (frequency * likelihood + 1.0) / (prior + 1.0);
            }
        }

        scores
    }

    fn predict_one(&self, features: &FeatureVector) -> Prediction {
        let scores = self.scores(features);

        let mut best: Option<(Label, f64)> = None;
        for (label, &score) in scores.iter() {
            match best {
                Some((_, top)) if top >= score => {}
                _ => best = Some((label, score)),
            }
        }
        let (label, score) = best.unwrap_or((Label::Spam, 1.0));

        Prediction::new(label, score, score)
    }
}

impl Classifier for NaiveBayes {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::NaiveBayes
    }

    fn fit(&mut self, training_set: TrainingSet) -> Result<()> {
        let dimension = training_set.vocabulary().len();
        let total = training_set.len();

        let mut counts = PerLabel::<usize>::default();
        let mut sums = PerLabel::from_fn(|_| vec![0.0; dimension]);
        for entry in training_set.entries() {
            *counts.get_mut(entry.label) += 1;
            let sums = sums.get_mut(entry.label);
            for (slot, frequency) in sums.iter_mut().zip(entry.features.values()) {
                *slot += f64::from(frequency);
            }
        }

        let priors = counts.map(|_, &count| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        });
        let likelihoods: PerLabel<Vec<f64>> = sums.map(|label, sums| {
            let prior = *priors.get(label);
            sums.iter()
                .map(|sum| if prior == 0.0 { 0.0 } else { sum / prior })
                .collect()
        });

        log::debug!(
            "Naive Bayes fit on {} entries: priors spam={:.4} not_spam={:.4}",
            total,
            priors.spam,
            priors.not_spam
        );

        self.priors = priors;
        self.likelihoods = likelihoods;
        self.training_set = training_set;
        Ok(())
    }

    fn predict(&mut self, features: &[FeatureVector]) -> Result<Vec<Prediction>> {
        let model = &*self;
        Ok(features.par_iter().map(|x| model.predict_one(x)).collect())
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

    fn optimize(&mut self, _history_length: usize) {
        self.training_set.clear_entries();
    }
}
