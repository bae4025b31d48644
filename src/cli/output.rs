//! Output formatting for CLI commands.

use std::fmt;

use serde::Serialize;

use crate::classifier::{ClassifierKind, Statistics};
use crate::cli::args::{OutputFormat, ScutumArgs};
use crate::engine::Classification;
use crate::error::Result;
use crate::label::Label;
use crate::report::Report;
use crate::store::{ModelInfo, ModelKey};

/// Result structure for training.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    pub key: ModelKey,
    pub documents: usize,
    pub duration_ms: u64,
    pub report: Report,
}

impl fmt::Display for TrainResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key:             {}", self.key)?;
        writeln!(f, "Documents:       {}", self.documents)?;
        writeln!(f, "Training time:   {}ms", self.duration_ms)?;
        write!(f, "{}", self.report)
    }
}

/// One classified comment.
#[derive(Debug, Serialize)]
pub struct ClassifiedComment {
    pub content: String,
    #[serde(flatten)]
    pub classification: Classification,
}

/// Result structure for classification.
#[derive(Debug, Serialize)]
pub struct ClassifyResults {
    pub key: ModelKey,
    pub results: Vec<ClassifiedComment>,
    /// Fraction of correct predictions among the comments that carried a
    /// label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl ClassifyResults {
    pub fn new(key: ModelKey, results: Vec<ClassifiedComment>) -> Self {
        let checked: Vec<bool> = results
            .iter()
            .filter_map(|r| r.classification.is_correct())
            .collect();
        let accuracy = if checked.is_empty() {
            None
        } else {
            Some(checked.iter().filter(|c| **c).count() as f64 / checked.len() as f64)
        };
        ClassifyResults {
            key,
            results,
            accuracy,
        }
    }
}

impl fmt::Display for ClassifyResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<9} {:>10}  content", "label", "confidence")?;
        for result in &self.results {
            let marker = match result.classification.is_correct() {
                Some(true) => " ",
                Some(false) => "!",
                None => " ",
            };
            write!(
                f,
                "\n{:<9} {:>10.4} {marker}{}",
                result.classification.label.as_str(),
                result.classification.confidence,
                truncate(&result.content, 60)
            )?;
        }
        if let Some(accuracy) = self.accuracy {
            write!(f, "\n\nAccuracy: {accuracy:.4}")?;
        }
        Ok(())
    }
}

/// Result structure for an online update.
#[derive(Debug, Serialize)]
pub struct UpdateResult {
    pub key: ModelKey,
    pub label: Label,
    /// Label the model predicted before learning from the comment.
    pub predicted: Label,
    pub loss: f64,
    pub latest_step: usize,
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key:         {}", self.key)?;
        writeln!(f, "Label:       {}", self.label.as_str())?;
        writeln!(f, "Predicted:   {}", self.predicted.as_str())?;
        writeln!(f, "Loss:        {:.6}", self.loss)?;
        write!(f, "Latest step: {}", self.latest_step)
    }
}

/// Result structure for a standalone cross-validation run.
#[derive(Debug, Serialize)]
pub struct CrossValidationResult {
    pub kind: ClassifierKind,
    pub folds: usize,
    pub stratified: bool,
    pub duration_ms: u64,
    pub statistics: Statistics,
}

impl fmt::Display for CrossValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Type:            {}", self.kind)?;
        writeln!(
            f,
            "Folds:           {} ({})",
            self.folds,
            if self.stratified { "stratified" } else { "plain" }
        )?;
        writeln!(f, "Duration:        {}ms", self.duration_ms)?;
        write!(f, "{}", self.statistics)?;
        if !self.statistics.fold_accuracies.is_empty() {
            write!(f, "\n\nFold accuracies:")?;
            for (i, accuracy) in self.statistics.fold_accuracies.iter().enumerate() {
                write!(f, "\n  fold {:<3} {accuracy:.4}", i + 1)?;
            }
        }
        Ok(())
    }
}

/// Result structure for listing models.
#[derive(Debug, Serialize)]
pub struct ListResult {
    pub directory: String,
    pub models: Vec<ModelEntry>,
}

/// A listed model, with envelope details when requested.
#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub key: ModelKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ModelInfo>,
}

impl fmt::Display for ListResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Models in {}:", self.directory)?;
        if self.models.is_empty() {
            return write!(f, "\n  (none)");
        }
        for entry in &self.models {
            match &entry.info {
                Some(info) => write!(
                    f,
                    "\n  {:<20} {:<20} v{} {} {}",
                    entry.key,
                    info.kind,
                    info.format_version,
                    info.saved_at.format("%Y-%m-%d %H:%M:%S"),
                    format_bytes(info.size)
                )?,
                None => write!(f, "\n  {}", entry.key)?,
            }
        }
        Ok(())
    }
}

/// Result structure for deleting a model.
#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub key: ModelKey,
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted: {}", self.key)
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + fmt::Display>(
    message: &str,
    result: &T,
    args: &ScutumArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: fmt::Display>(message: &str, result: &T, args: &ScutumArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }
    println!("{result}");
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &ScutumArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format bytes in human-readable format.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let mut truncated: String = single_line.chars().take(max_chars - 3).collect();
        truncated.push_str("...");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(label: Label, correct: Option<Label>) -> ClassifiedComment {
        ClassifiedComment {
            content: "text".to_string(),
            classification: Classification {
                label,
                confidence: 0.5,
                correct,
            },
        }
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_classify_accuracy() {
        let results = ClassifyResults::new(
            ModelKey::Id(1),
            vec![
                classified(Label::Spam, Some(Label::Spam)),
                classified(Label::Spam, Some(Label::NotSpam)),
                classified(Label::NotSpam, None),
            ],
        );
        assert_eq!(results.accuracy, Some(0.5));

        let unlabeled = ClassifyResults::new(ModelKey::Id(1), vec![classified(Label::Spam, None)]);
        assert_eq!(unlabeled.accuracy, None);
        let json = serde_json::to_value(&unlabeled).unwrap();
        assert!(json.get("accuracy").is_none());
        assert_eq!(json["results"][0]["label"], "spam");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a\nb", 10), "a b");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
