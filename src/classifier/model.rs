//! The closed set of classifiers and the factory that builds them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::classifier::{Classifier, Fallback, Prediction};
use crate::classifier::naive_bayes::NaiveBayes;
use crate::classifier::passive_aggressive::PassiveAggressive;
use crate::classifier::statistics::Statistics;
use crate::config::ClassifierConfig;
use crate::error::{Result, ScutumError};
use crate::feature::training_set::TrainingSet;
use crate::feature::vector::FeatureVector;
use crate::label::Label;

/// Classifier algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    NaiveBayes,
    PassiveAggressive,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 2] = [ClassifierKind::NaiveBayes, ClassifierKind::PassiveAggressive];

    pub fn as_str(self) -> &'static str {
        match self {
            ClassifierKind::NaiveBayes => "naive_bayes",
            ClassifierKind::PassiveAggressive => "passive_aggressive",
        }
    }

    /// Discriminator byte used by the model envelope.
    pub fn tag(self) -> u8 {
        match self {
            ClassifierKind::NaiveBayes => 1,
            ClassifierKind::PassiveAggressive => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            1 => Ok(ClassifierKind::NaiveBayes),
            2 => Ok(ClassifierKind::PassiveAggressive),
            other => Err(ScutumError::serialization(format!(
                "unknown classifier tag {other}"
            ))),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = ScutumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "naive_bayes" | "naive-bayes" | "naivebayes" | "nb" | "bayes" => {
                Ok(ClassifierKind::NaiveBayes)
            }
            "passive_aggressive" | "passive-aggressive" | "pa" => {
                Ok(ClassifierKind::PassiveAggressive)
            }
            other => Err(ScutumError::invalid_argument(format!(
                "unknown classifier '{other}'"
            ))),
        }
    }
}

/// A classifier of either kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Model {
    NaiveBayes(NaiveBayes),
    PassiveAggressive(PassiveAggressive),
}

impl Model {
    /// Build an untrained classifier of the given kind.
    pub fn new(kind: ClassifierKind, config: &ClassifierConfig) -> Self {
        let fallback = Fallback::from_config(config);
        match kind {
            ClassifierKind::NaiveBayes => Model::NaiveBayes(NaiveBayes::with_fallback(fallback)),
            ClassifierKind::PassiveAggressive => Model::PassiveAggressive(
                PassiveAggressive::with_config(config.passive_aggressive.clone())
                    .with_fallback(fallback),
            ),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            Model::NaiveBayes(classifier) => classifier,
            Model::PassiveAggressive(classifier) => classifier,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Classifier {
        match self {
            Model::NaiveBayes(classifier) => classifier,
            Model::PassiveAggressive(classifier) => classifier,
        }
    }

    /// Online update of a single instance. Only Passive-Aggressive models
    /// learn incrementally.
    pub fn update(
        &mut self,
        features: &FeatureVector,
        label: Option<Label>,
        step: Option<usize>,
    ) -> Result<Prediction> {
        match self {
            Model::PassiveAggressive(classifier) => classifier.update(features, label, step),
            Model::NaiveBayes(_) => Err(ScutumError::InvalidOperation(
                "naive bayes models do not support online updates".to_string(),
            )),
        }
    }
}

impl Classifier for Model {
    fn kind(&self) -> ClassifierKind {
        self.inner().kind()
    }

    fn fit(&mut self, training_set: TrainingSet) -> Result<()> {
        self.inner_mut().fit(training_set)
    }

    fn predict(&mut self, features: &[FeatureVector]) -> Result<Vec<Prediction>> {
        self.inner_mut().predict(features)
    }

    fn training_set(&self) -> &TrainingSet {
        self.inner().training_set()
    }

    fn statistics(&self) -> &Statistics {
        self.inner().statistics()
    }

    fn statistics_mut(&mut self) -> &mut Statistics {
        self.inner_mut().statistics_mut()
    }

    fn fallback(&self) -> Fallback {
        self.inner().fallback()
    }

    fn optimize(&mut self, history_length: usize) {
        self.inner_mut().optimize(history_length)
    }
}

impl From<NaiveBayes> for Model {
    fn from(classifier: NaiveBayes) -> Self {
        Model::NaiveBayes(classifier)
    }
}

impl From<PassiveAggressive> for Model {
    fn from(classifier: PassiveAggressive) -> Self {
        Model::PassiveAggressive(classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("pa".parse::<ClassifierKind>().unwrap(), ClassifierKind::PassiveAggressive);
        assert_eq!("NaiveBayes".parse::<ClassifierKind>().unwrap(), ClassifierKind::NaiveBayes);
        assert!("perceptron".parse::<ClassifierKind>().is_err());
    }

    #[test]
    fn test_tags() {
        for kind in ClassifierKind::ALL {
            assert_eq!(ClassifierKind::from_tag(kind.tag()).unwrap(), kind);
        }
        assert!(ClassifierKind::from_tag(0).is_err());
    }

    #[test]
    fn test_factory() {
        let config = ClassifierConfig::default();
        for kind in ClassifierKind::ALL {
            let model = Model::new(kind, &config);
            assert_eq!(model.kind(), kind);
            assert_eq!(model.fallback().label, Label::NotSpam);
        }
    }

    #[test]
    fn test_update_requires_online_model() {
        let mut model = Model::new(ClassifierKind::NaiveBayes, &ClassifierConfig::default());
        let x: FeatureVector = vec![("links_count", 0)].into_iter().collect();
        assert!(model.update(&x, None, None).is_err());
    }
}
