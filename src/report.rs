//! Model summaries.

use std::fmt;

use serde::Serialize;

use crate::classifier::{Classifier, ClassifierKind, Model};
use crate::label::PerLabel;

/// One weight snapshot of a Passive-Aggressive model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightSnapshot {
    pub step: usize,
    pub weights: Vec<(String, f64)>,
}

/// Algorithm-specific part of a report.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ReportExtra {
    /// Retained weight history, oldest first.
    WeightHistory(Vec<WeightSnapshot>),
    /// Per label likelihood of every vocabulary feature.
    Likelihoods(PerLabel<Vec<(String, f64)>>),
}

/// Summary of a trained model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    #[serde(rename = "type")]
    pub kind: ClassifierKind,
    pub instance_count: usize,
    pub attribute_count: usize,
    pub assert_count: usize,
    pub assertion_ratio: f64,
    pub deviation: f64,
    pub extra: ReportExtra,
}

impl Report {
    /// Summarize a model.
    pub fn from_model(model: &Model) -> Self {
        let statistics = model.statistics();
        let extra = match model {
            Model::NaiveBayes(classifier) => ReportExtra::Likelihoods(classifier.likelihood_table()),
            Model::PassiveAggressive(classifier) => {
                let vocabulary = classifier.vocabulary();
                ReportExtra::WeightHistory(
                    classifier
                        .history()
                        .iter()
                        .map(|(step, weights)| WeightSnapshot {
                            step,
                            weights: vocabulary
                                .label_values(weights)
                                .map(|(name, weight)| (name.to_string(), weight))
                                .collect(),
                        })
                        .collect(),
                )
            }
        };

        Report {
            kind: model.kind(),
            instance_count: statistics.total,
            attribute_count: model.vocabulary().len(),
            assert_count: statistics.asserts,
            assertion_ratio: statistics.assertion_ratio,
            deviation: statistics.deviation,
            extra,
        }
    }
}

/// Summarize a model.
pub fn report(model: &Model) -> Report {
    Report::from_model(model)
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Type:            {}", self.kind)?;
        writeln!(f, "Instances:       {}", self.instance_count)?;
        writeln!(f, "Attributes:      {}", self.attribute_count)?;
        writeln!(f, "Asserts:         {}", self.assert_count)?;
        writeln!(f, "Assertion ratio: {:.4}", self.assertion_ratio)?;
        write!(f, "Deviation:       {:.4}", self.deviation)?;

        match &self.extra {
            ReportExtra::WeightHistory(snapshots) => {
                if let Some(latest) = snapshots.last() {
                    write!(f, "\n\nWeights at step {} ({} retained):", latest.step, snapshots.len())?;
                    for (name, weight) in &latest.weights {
                        write!(f, "\n  {name:<24} {weight:>12.6}")?;
                    }
                }
            }
            ReportExtra::Likelihoods(table) => {
                write!(f, "\n\nLikelihoods:")?;
                write!(f, "\n  {:<24} {:>12} {:>12}", "feature", "spam", "not_spam")?;
                for ((name, spam), (_, not_spam)) in table.spam.iter().zip(&table.not_spam) {
                    write!(f, "\n  {name:<24} {spam:>12.4} {not_spam:>12.4}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::feature::{FeatureExtractor, LabeledDocument, TrainingSetBuilder};
    use crate::label::Label;

    fn trained(kind: ClassifierKind) -> Model {
        let builder = TrainingSetBuilder::new(FeatureExtractor::new().unwrap());
        let set = builder
            .build(&[
                LabeledDocument::new(Label::Spam, "cheap cheap cheap"),
                LabeledDocument::new(Label::NotSpam, "notes notes notes"),
            ])
            .unwrap();
        let mut model = Model::new(kind, &ClassifierConfig::default());
        model.train(set).unwrap();
        model
    }

    #[test]
    fn test_naive_bayes_report() {
        let report = report(&trained(ClassifierKind::NaiveBayes));

        assert_eq!(report.kind, ClassifierKind::NaiveBayes);
        assert_eq!(report.instance_count, 2);
        assert_eq!(report.attribute_count, 3);
        match &report.extra {
            ReportExtra::Likelihoods(table) => {
                assert_eq!(table.spam[1], ("cheap".to_string(), 6.0));
            }
            other => panic!("unexpected extra: {other:?}"),
        }
    }

    #[test]
    fn test_passive_aggressive_report() {
        let report = report(&trained(ClassifierKind::PassiveAggressive));

        match &report.extra {
            ReportExtra::WeightHistory(snapshots) => {
                assert_eq!(snapshots.len(), 3);
                assert_eq!(snapshots[0].step, 0);
                assert!(snapshots[0].weights.iter().all(|(_, w)| *w == 0.0));
            }
            other => panic!("unexpected extra: {other:?}"),
        }
    }

    #[test]
    fn test_report_json_shape() {
        let report = report(&trained(ClassifierKind::NaiveBayes));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["type"], "naive_bayes");
        assert_eq!(json["instance_count"], 2);
        assert_eq!(json["extra"]["type"], "likelihoods");
        assert!(report.to_string().contains("Likelihoods:"));
    }
}
