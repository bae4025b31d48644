//! Training and evaluation statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters describing how a model was trained and how well it validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Instances in the last full training run.
    pub total: usize,
    /// Correct held-out predictions during cross-validation.
    pub asserts: usize,
    /// Held-out predictions made during cross-validation.
    pub evaluated: usize,
    /// `asserts / total`, where `total` counts every training instance.
    pub assertion_ratio: f64,
    /// Sample standard deviation of the per-fold accuracies.
    pub deviation: f64,
    /// Accuracy of each evaluated fold, in fold order.
    pub fold_accuracies: Vec<f64>,
}

impl Statistics {
    pub fn new(total: usize) -> Self {
        Statistics {
            total,
            ..Default::default()
        }
    }

    /// Whether cross-validation has filled in the evaluation fields.
    pub fn is_validated(&self) -> bool {
        self.evaluated > 0
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instances:       {}", self.total)?;
        if !self.is_validated() {
            return write!(f, "Cross-validation: not run");
        }
        writeln!(f, "Evaluated:       {}", self.evaluated)?;
        writeln!(f, "Asserts:         {}", self.asserts)?;
        writeln!(f, "Assertion ratio: {:.4}", self.assertion_ratio)?;
        write!(f, "Deviation:       {:.4}", self.deviation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let stats = Statistics::new(12);
        assert!(stats.to_string().contains("not run"));

        let stats = Statistics {
            total: 12,
            asserts: 9,
            evaluated: 10,
            assertion_ratio: 0.9,
            deviation: 0.1,
            fold_accuracies: vec![1.0, 0.8],
        };
        let text = stats.to_string();
        assert!(text.contains("Asserts:         9"));
        assert!(text.contains("Assertion ratio: 0.9000"));
    }
}
