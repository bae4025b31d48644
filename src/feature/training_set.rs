//! Labeled corpora aligned to a vocabulary.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScutumError};
use crate::feature::extractor::FeatureExtractor;
use crate::feature::vector::FeatureVector;
use crate::feature::vocabulary::Vocabulary;
use crate::label::{Label, PerLabel};

/// Raw training input: a label and the text it applies to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledDocument {
    pub label: Label,
    pub content: String,
}

impl LabeledDocument {
    pub fn new<S: Into<String>>(label: Label, content: S) -> Self {
        Self {
            label,
            content: content.into(),
        }
    }
}

/// One labeled instance whose features are aligned to the vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingEntry {
    pub label: Label,
    pub features: FeatureVector,
}

/// A vocabulary and the ordered entries aligned to it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSet {
    vocabulary: Vocabulary,
    entries: Vec<TrainingEntry>,
}

impl TrainingSet {
    /// Assemble a training set, checking that every entry matches the vocabulary.
    pub fn new(vocabulary: Vocabulary, entries: Vec<TrainingEntry>) -> Result<Self> {
        let set = TrainingSet {
            vocabulary,
            entries,
        };
        set.validate()?;
        Ok(set)
    }

    /// Check the alignment invariant.
    pub fn validate(&self) -> Result<()> {
        for (i, entry) in self.entries.iter().enumerate() {
            if !self.vocabulary.is_aligned(&entry.features) {
                return Err(ScutumError::invalid_training_set(format!(
                    "entry {i} has {} features but the vocabulary has {}, or their order differs",
                    entry.features.len(),
                    self.vocabulary.len()
                )));
            }
        }
        Ok(())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn entries(&self) -> &[TrainingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries carrying each label.
    pub fn label_counts(&self) -> PerLabel<usize> {
        let mut counts = PerLabel::default();
        for entry in &self.entries {
            *counts.get_mut(entry.label) += 1;
        }
        counts
    }

    /// Fraction of the entries carrying each label.
    pub fn classes_balance(&self) -> Result<PerLabel<f64>> {
        if self.entries.is_empty() {
            return Err(ScutumError::EmptyModel);
        }
        let total = self.entries.len() as f64;
        Ok(self.label_counts().map(|_, count| *count as f64 / total))
    }

    /// A new set over the same vocabulary holding the selected entries, in
    /// the order given.
    pub fn subset(&self, indices: &[usize]) -> TrainingSet {
        TrainingSet {
            vocabulary: self.vocabulary.clone(),
            entries: indices
                .iter()
                .filter_map(|&i| self.entries.get(i).cloned())
                .collect(),
        }
    }

    /// Drop the entries, keeping the vocabulary.
    pub fn clear_entries(&mut self) {
        self.entries.clear();
    }
}

/// Builds a [`TrainingSet`] from labeled documents.
#[derive(Clone, Debug)]
pub struct TrainingSetBuilder {
    extractor: FeatureExtractor,
}

impl TrainingSetBuilder {
    pub fn new(extractor: FeatureExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Extract every document, grow the vocabulary in first-seen order, then
    /// align each entry to it.
    pub fn build(&self, documents: &[LabeledDocument]) -> Result<TrainingSet> {
        if documents.is_empty() {
            return Err(ScutumError::EmptyCorpus);
        }

        let mut vocabulary = Vocabulary::new();
        let mut extracted = Vec::with_capacity(documents.len());
        for document in documents {
            let features = self.extractor.extract(&document.content)?;
            for name in features.keys() {
                vocabulary.observe(name);
            }
            extracted.push((document.label, features));
        }

        let entries = extracted
            .into_iter()
            .map(|(label, features)| TrainingEntry {
                label,
                features: vocabulary.align(&features),
            })
            .collect();

        log::debug!(
            "Built training set: {} documents, {} features",
            documents.len(),
            vocabulary.len()
        );

        Ok(TrainingSet {
            vocabulary,
            entries,
        })
    }

    /// Extract a document against an existing, frozen vocabulary.
    pub fn features_for(&self, vocabulary: &Vocabulary, text: &str) -> Result<FeatureVector> {
        Ok(vocabulary.align(&self.extractor.extract(text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TrainingSetBuilder {
        TrainingSetBuilder::new(FeatureExtractor::new().unwrap())
    }

    fn corpus() -> Vec<LabeledDocument> {
        vec![
            LabeledDocument::new(Label::Spam, "cheap cheap cheap pills pills pills"),
            LabeledDocument::new(Label::NotSpam, "meeting meeting meeting notes"),
            LabeledDocument::new(Label::Spam, "pills pills pills online online online"),
        ]
    }

    #[test]
    fn test_build_vocabulary_in_first_seen_order() {
        let set = builder().build(&corpus()).unwrap();

        assert_eq!(
            set.vocabulary().names(),
            &["links_count", "cheap", "pills", "meeting", "online"]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_build_aligns_every_entry() {
        let set = builder().build(&corpus()).unwrap();

        for entry in set.entries() {
            assert!(set.vocabulary().is_aligned(&entry.features));
        }
        assert_eq!(set.entries()[1].features.get("cheap"), Some(0));
        assert_eq!(set.entries()[1].features.get("meeting"), Some(3));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_build_empty_corpus() {
        let result = builder().build(&[]);
        assert!(matches!(result, Err(ScutumError::EmptyCorpus)));
    }

    #[test]
    fn test_new_rejects_misaligned_entries() {
        let vocabulary: Vocabulary = ["links_count", "buy"].into_iter().collect();
        let entry = TrainingEntry {
            label: Label::Spam,
            features: vec![("buy", 1)].into_iter().collect(),
        };

        let result = TrainingSet::new(vocabulary, vec![entry]);
        assert!(matches!(result, Err(ScutumError::InvalidTrainingSet(_))));
    }

    #[test]
    fn test_classes_balance() {
        let set = builder().build(&corpus()).unwrap();
        let balance = set.classes_balance().unwrap();

        assert!((balance.spam - 2.0 / 3.0).abs() < 1e-12);
        assert!((balance.not_spam - 1.0 / 3.0).abs() < 1e-12);

        assert!(matches!(
            TrainingSet::default().classes_balance(),
            Err(ScutumError::EmptyModel)
        ));
    }

    #[test]
    fn test_features_for_frozen_vocabulary() {
        let builder = builder();
        let set = builder.build(&corpus()).unwrap();

        let features = builder
            .features_for(set.vocabulary(), "online online online brandnew brandnew brandnew")
            .unwrap();

        assert!(set.vocabulary().is_aligned(&features));
        assert_eq!(features.get("online"), Some(3));
        assert!(!features.contains("brandnew"));
    }

    #[test]
    fn test_subset_keeps_vocabulary() {
        let set = builder().build(&corpus()).unwrap();
        let subset = set.subset(&[2, 0]);

        assert_eq!(subset.vocabulary(), set.vocabulary());
        assert_eq!(subset.entries()[0], set.entries()[2]);
        assert_eq!(subset.len(), 2);
    }
}
