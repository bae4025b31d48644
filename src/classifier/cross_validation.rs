//! K-fold cross-validation, stratified or plain.
//!
//! Folds are built by scanning the entries in order, so the same training
//! set always yields the same folds. Each fold is evaluated by training a
//! clone of the prototype classifier on every other fold and classifying
//! the held-out one; clones never touch the prototype, which lets folds run
//! on the rayon pool.

use rayon::prelude::*;

use crate::classifier::classifier::Classifier;
use crate::config::CrossValidationConfig;
use crate::error::{Result, ScutumError};
use crate::feature::training_set::TrainingSet;
use crate::feature::vector::FeatureVector;
use crate::label::{Label, PerLabel};

/// Result of evaluating one held-out fold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldOutcome {
    /// Held-out instances in the fold.
    pub size: usize,
    /// Correctly classified held-out instances.
    pub asserts: usize,
}

impl FoldOutcome {
    pub fn accuracy(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.asserts as f64 / self.size as f64
        }
    }
}

/// Aggregated fold outcomes over a training set of `total` instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrossValidation {
    folds: Vec<FoldOutcome>,
    total: usize,
}

impl CrossValidation {
    pub fn new(folds: Vec<FoldOutcome>, total: usize) -> Self {
        Self { folds, total }
    }

    /// Instances in the training set, held out or not.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn folds(&self) -> &[FoldOutcome] {
        &self.folds
    }

    pub fn asserts(&self) -> usize {
        self.folds.iter().map(|f| f.asserts).sum()
    }

    /// Total held-out predictions made.
    pub fn evaluated(&self) -> usize {
        self.folds.iter().map(|f| f.size).sum()
    }

    /// Correct held-out predictions over all training instances. Entries
    /// left out of every fold count as misses.
    pub fn assertion_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.asserts() as f64 / self.total as f64
        }
    }

    /// Accuracies of the non-empty folds.
    pub fn accuracies(&self) -> Vec<f64> {
        self.folds
            .iter()
            .filter(|f| f.size > 0)
            .map(FoldOutcome::accuracy)
            .collect()
    }

    /// Sample standard deviation of fold accuracy around the assertion
    /// ratio, with `folds - 1` as divisor. Empty folds add nothing to the sum.
    pub fn deviation(&self) -> f64 {
        if self.folds.len() <= 1 {
            return 0.0;
        }
        let ratio = self.assertion_ratio();
        let sum: f64 = self
            .accuracies()
            .iter()
            .map(|a| (a - ratio).powi(2))
            .sum();
        (sum / (self.folds.len() - 1) as f64).sqrt()
    }
}

/// Builds folds and evaluates a classifier over them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossValidator {
    folds: usize,
    stratified: bool,
    parallel: bool,
}

impl CrossValidator {
    /// A stratified, parallel validator with `folds` folds.
    pub fn new(folds: usize) -> Self {
        CrossValidator {
            folds,
            stratified: true,
            parallel: true,
        }
    }

    pub fn from_config(config: &CrossValidationConfig) -> Self {
        CrossValidator {
            folds: config.folds,
            stratified: config.stratified,
            parallel: config.parallel,
        }
    }

    pub fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    pub fn is_stratified(&self) -> bool {
        self.stratified
    }

    /// Split entry indices into folds.
    ///
    /// When the set holds fewer entries than requested folds, one fold per
    /// entry is used. Entries that fit in no fold are left out of
    /// validation.
    pub fn partition(&self, training_set: &TrainingSet) -> Result<Vec<Vec<usize>>> {
        if self.folds < 2 {
            return Err(ScutumError::invalid_argument(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.folds
            )));
        }
        let balance = training_set.classes_balance()?;

        let total = training_set.len();
        let num_folds = self.folds.min(total);
        let target = total / num_folds;

        let mut folds: Vec<Vec<usize>> = vec![Vec::with_capacity(target); num_folds];

        if self.stratified {
            let mut counters = vec![PerLabel::<usize>::default(); num_folds];
            for (i, entry) in training_set.entries().iter().enumerate() {
                let label = entry.label;
                let slot = (0..num_folds).find(|&f| {
                    folds[f].len() < target
                        && *counters[f].get(label) as f64 / target as f64 <= *balance.get(label)
                });
                if let Some(f) = slot {
                    folds[f].push(i);
                    *counters[f].get_mut(label) += 1;
                }
            }
        } else {
            for i in 0..total {
                let slot = (0..num_folds)
                    .map(|offset| (i + offset) % num_folds)
                    .find(|&f| folds[f].len() < target);
                if let Some(f) = slot {
                    folds[f].push(i);
                }
            }
        }

        Ok(folds)
    }

    /// Evaluate `prototype` over the folds of `training_set`.
    pub fn evaluate<C>(&self, prototype: &C, training_set: &TrainingSet) -> Result<CrossValidation>
    where
        C: Classifier + Clone,
    {
        let folds = self.partition(training_set)?;
        log::debug!(
            "Cross-validating {} over {} folds ({} entries, stratified: {})",
            prototype.kind(),
            folds.len(),
            training_set.len(),
            self.stratified
        );

        let run = |held_out: usize| evaluate_fold(prototype, training_set, &folds, held_out);
        let outcomes = if self.parallel {
            (0..folds.len())
                .into_par_iter()
                .map(run)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..folds.len()).map(run).collect::<Result<Vec<_>>>()?
        };

        for (i, outcome) in outcomes.iter().enumerate() {
            log::debug!(
                "Fold {i}: {}/{} correct ({:.4})",
                outcome.asserts,
                outcome.size,
                outcome.accuracy()
            );
        }

        Ok(CrossValidation::new(outcomes, training_set.len()))
    }
}

fn evaluate_fold<C>(
    prototype: &C,
    training_set: &TrainingSet,
    folds: &[Vec<usize>],
    held_out: usize,
) -> Result<FoldOutcome>
where
    C: Classifier + Clone,
{
    let train_indices: Vec<usize> = folds
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != held_out)
        .flat_map(|(_, fold)| fold.iter().copied())
        .collect();

    let mut classifier = prototype.clone();
    classifier.train(training_set.subset(&train_indices))?;

    let entries = training_set.entries();
    let (features, labels): (Vec<FeatureVector>, Vec<Label>) = folds[held_out]
        .iter()
        .map(|&i| (entries[i].features.clone(), entries[i].label))
        .unzip();

    let predictions = classifier.classify(&features, false)?;
    let asserts = predictions
        .iter()
        .zip(&labels)
        .filter(|(prediction, label)| prediction.label == **label)
        .count();

    Ok(FoldOutcome {
        size: labels.len(),
        asserts,
    })
}
