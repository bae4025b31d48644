//! High-level spam filter.
//!
//! [`SpamFilter`] owns the extraction pipeline, a model store and at most
//! one active model. Passive-Aggressive models change on every
//! classification, so the active model sits behind a mutex and all calls
//! against it are serialized.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use scutum::classifier::ClassifierKind;
//! use scutum::config::ScutumConfig;
//! use scutum::engine::{ClassifyRequest, SpamFilter};
//! use scutum::feature::LabeledDocument;
//! use scutum::label::Label;
//! use scutum::store::{MemoryModelStore, ModelKey};
//!
//! # fn main() -> scutum::error::Result<()> {
//! let filter = SpamFilter::new(ScutumConfig::default(), Arc::new(MemoryModelStore::new()))?;
//! let documents = vec![
//!     LabeledDocument::new(Label::Spam, "free money free money free money www.spam.biz"),
//!     LabeledDocument::new(Label::NotSpam, "hello friend hello friend hello friend"),
//! ];
//! filter.build_model(ClassifierKind::NaiveBayes, &documents, &ModelKey::Id(1))?;
//!
//! let results = filter.classify(&[ClassifyRequest::new("free money free money free money")])?;
//! assert_eq!(results[0].label, Label::Spam);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, ClassifierKind, CrossValidator, Model, Prediction, Statistics};
use crate::config::ScutumConfig;
use crate::corpus::DocumentStore;
use crate::error::{Result, ScutumError};
use crate::feature::extractor::FeatureExtractor;
use crate::feature::training_set::{LabeledDocument, TrainingSetBuilder};
use crate::label::Label;
use crate::report::Report;
use crate::store::{ModelKey, ModelStore};

/// A document to classify, optionally with its known label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl ClassifyRequest {
    pub fn new<S: Into<String>>(content: S) -> Self {
        ClassifyRequest {
            content: content.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }
}

/// Classification of one request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,
    pub confidence: f64,
    /// The label supplied with the request, for accuracy checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<Label>,
}

impl Classification {
    /// Whether the prediction matches the supplied label, when there is one.
    pub fn is_correct(&self) -> Option<bool> {
        self.correct.map(|label| label == self.label)
    }
}

struct ActiveModel {
    key: ModelKey,
    model: Model,
}

/// Spam filter facade.
pub struct SpamFilter {
    config: ScutumConfig,
    builder: TrainingSetBuilder,
    store: Arc<dyn ModelStore>,
    active: Mutex<Option<ActiveModel>>,
}

impl std::fmt::Debug for SpamFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpamFilter")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("active", &self.active_key())
            .finish()
    }
}

impl SpamFilter {
    /// Create a filter over a model store.
    pub fn new(config: ScutumConfig, store: Arc<dyn ModelStore>) -> Result<Self> {
        config.validate()?;
        let extractor = FeatureExtractor::from_config(&config.extraction)?;
        Ok(SpamFilter {
            config,
            builder: TrainingSetBuilder::new(extractor),
            store,
            active: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ScutumConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ModelStore> {
        &self.store
    }

    /// Key of the active model, if any.
    pub fn active_key(&self) -> Option<ModelKey> {
        self.active.lock().as_ref().map(|active| active.key.clone())
    }

    /// Train a model, save it under `key` and make it active.
    ///
    /// Cross-validation and history pruning run according to the training
    /// configuration.
    pub fn build_model(
        &self,
        kind: ClassifierKind,
        documents: &[LabeledDocument],
        key: &ModelKey,
    ) -> Result<Report> {
        log::info!("Building {kind} model from {} documents", documents.len());
        let training_set = self.builder.build(documents)?;

        let mut model = Model::new(kind, &self.config.classifier);
        model.train(training_set)?;

        if self.config.training.cross_validate {
            let validator = CrossValidator::from_config(&self.config.cross_validation);
            let statistics = model.cross_validate_with(&validator)?;
            log::info!(
                "Cross-validation: {}/{} correct, ratio {:.4}, deviation {:.4}",
                statistics.asserts,
                statistics.evaluated,
                statistics.assertion_ratio,
                statistics.deviation
            );
        }

        if self.config.training.optimize {
            model.optimize(self.config.training.history_length);
        }

        self.store.save(key, &model)?;
        let report = Report::from_model(&model);
        *self.active.lock() = Some(ActiveModel {
            key: key.clone(),
            model,
        });
        Ok(report)
    }

    /// Train from every labeled document of a document store.
    pub fn build_model_from_store(
        &self,
        kind: ClassifierKind,
        documents: &dyn DocumentStore,
        key: &ModelKey,
    ) -> Result<Report> {
        self.build_model(kind, &documents.training_documents()?, key)
    }

    /// Make the model stored under `key` active.
    pub fn load_model(&self, key: &ModelKey) -> Result<ClassifierKind> {
        let model = self.store.load(key)?;
        let kind = model.kind();
        *self.active.lock() = Some(ActiveModel {
            key: key.clone(),
            model,
        });
        Ok(kind)
    }

    /// Persist the active model under its key.
    pub fn save(&self) -> Result<()> {
        let active = self.active.lock();
        let active = active.as_ref().ok_or_else(no_model)?;
        self.store.save(&active.key, &active.model)
    }

    /// Classify documents with the active model, falling back to the
    /// default label for ambiguous predictions.
    pub fn classify(&self, requests: &[ClassifyRequest]) -> Result<Vec<Classification>> {
        let mut active = self.active.lock();
        let active = active.as_mut().ok_or_else(no_model)?;
        let model = &mut active.model;

        let features = requests
            .iter()
            .map(|request| self.builder.features_for(model.vocabulary(), &request.content))
            .collect::<Result<Vec<_>>>()?;
        let predictions = model.classify(&features, true)?;

        Ok(predictions
            .into_iter()
            .zip(requests)
            .map(|(prediction, request)| Classification {
                label: prediction.label,
                confidence: prediction.confidence,
                correct: request.label,
            })
            .collect())
    }

    /// Online update of the active model with one labeled document, then
    /// persist it. `step` replays from an earlier point of the history.
    pub fn update(&self, content: &str, label: Label, step: Option<usize>) -> Result<Prediction> {
        let mut active = self.active.lock();
        let active = active.as_mut().ok_or_else(no_model)?;

        let features = self.builder.features_for(active.model.vocabulary(), content)?;
        let prediction = active.model.update(&features, Some(label), step)?;
        self.store.save(&active.key, &active.model)?;
        Ok(prediction)
    }

    /// Re-run cross-validation on the active model.
    ///
    /// Needs the cached training entries, which are gone after pruning.
    pub fn cross_validate(&self, folds: usize, stratified: bool) -> Result<Statistics> {
        let mut active = self.active.lock();
        let active = active.as_mut().ok_or_else(no_model)?;

        let validator = CrossValidator::new(folds)
            .with_stratified(stratified)
            .with_parallel(self.config.cross_validation.parallel);
        active.model.cross_validate_with(&validator)
    }

    /// Latest training step of the active model, for Passive-Aggressive
    /// models only.
    pub fn latest_step(&self) -> Option<usize> {
        match self.active.lock().as_ref().map(|active| &active.model) {
            Some(Model::PassiveAggressive(classifier)) => Some(classifier.history().latest_step()),
            _ => None,
        }
    }

    /// Summary of the active model.
    pub fn report(&self) -> Result<Report> {
        let active = self.active.lock();
        let active = active.as_ref().ok_or_else(no_model)?;
        Ok(Report::from_model(&active.model))
    }
}

fn no_model() -> ScutumError {
    ScutumError::InvalidOperation("no model loaded".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryModelStore;

    fn filter() -> SpamFilter {
        SpamFilter::new(ScutumConfig::default(), Arc::new(MemoryModelStore::new())).unwrap()
    }

    fn documents() -> Vec<LabeledDocument> {
        let mut documents = Vec::new();
        for i in 0..6 {
            documents.push(LabeledDocument::new(
                Label::Spam,
                format!("cheap pills cheap pills cheap pills www.spam{i}.biz"),
            ));
            documents.push(LabeledDocument::new(
                Label::NotSpam,
                "meeting notes meeting notes meeting notes",
            ));
        }
        documents
    }

    #[test]
    fn test_requires_model() {
        let filter = filter();
        assert!(filter.classify(&[ClassifyRequest::new("x")]).is_err());
        assert!(filter.report().is_err());
        assert!(filter.active_key().is_none());
    }

    #[test]
    fn test_build_and_classify() {
        let filter = filter();
        let key = ModelKey::Id(1);
        let report = filter
            .build_model(ClassifierKind::NaiveBayes, &documents(), &key)
            .unwrap();

        assert_eq!(report.instance_count, 12);
        assert!(report.assertion_ratio >= 0.0 && report.assertion_ratio <= 1.0);
        assert!(filter.store().contains(&key));

        let results = filter
            .classify(&[
                ClassifyRequest::new("cheap pills cheap pills cheap pills").with_label(Label::Spam),
                ClassifyRequest::new("meeting notes meeting notes meeting notes"),
            ])
            .unwrap();

        assert_eq!(results[0].label, Label::Spam);
        assert_eq!(results[0].is_correct(), Some(true));
        assert_eq!(results[1].label, Label::NotSpam);
        assert_eq!(results[1].correct, None);
    }

    #[test]
    fn test_load_model() {
        let store: Arc<dyn ModelStore> = Arc::new(MemoryModelStore::new());
        let first = SpamFilter::new(ScutumConfig::default(), store.clone()).unwrap();
        first
            .build_model(ClassifierKind::PassiveAggressive, &documents(), &ModelKey::Id(4))
            .unwrap();

        let second = SpamFilter::new(ScutumConfig::default(), store).unwrap();
        assert_eq!(
            second.load_model(&ModelKey::Id(4)).unwrap(),
            ClassifierKind::PassiveAggressive
        );
        assert_eq!(second.report().unwrap(), first.report().unwrap());
    }

    #[test]
    fn test_update_persists() {
        let filter = filter();
        let key = ModelKey::name("online").unwrap();
        filter
            .build_model(ClassifierKind::PassiveAggressive, &documents(), &key)
            .unwrap();
        let before = filter.store().load(&key).unwrap();

        filter
            .update("cheap pills cheap pills cheap pills", Label::Spam, None)
            .unwrap();

        let after = filter.store().load(&key).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_update_rejects_naive_bayes() {
        let filter = filter();
        filter
            .build_model(ClassifierKind::NaiveBayes, &documents(), &ModelKey::Id(2))
            .unwrap();
        assert!(filter.update("cheap", Label::Spam, None).is_err());
    }
}
