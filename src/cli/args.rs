//! Command line argument parsing for the scutum CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierKind;
use crate::label::Label;
use crate::store::ModelKey;

/// Scutum - spam filtering for blog and forum comments
#[derive(Parser, Debug, Clone)]
#[command(name = "scutum")]
#[command(about = "Train, evaluate and run spam classifiers for short comments")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ScutumArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding stored models
    #[arg(short, long, env = "SCUTUM_MODELS", default_value = "models")]
    pub models: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ScutumArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a labeled JSONL corpus and store it
    Train(TrainArgs),

    /// Classify comments with a stored model
    Classify(ClassifyArgs),

    /// Teach a stored Passive-Aggressive model one labeled comment
    Update(UpdateArgs),

    /// Show the summary of a stored model
    Report(ReportArgs),

    /// Cross-validate a classifier on a labeled corpus without storing it
    #[command(name = "cross-validate")]
    CrossValidate(CrossValidateArgs),

    /// List stored models
    List(ListArgs),

    /// Delete a stored model
    Delete(DeleteArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Labeled corpus (JSONL with id, content and label)
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Classifier algorithm (naive-bayes or pa)
    #[arg(short = 'a', long, default_value = "naive_bayes")]
    pub algorithm: ClassifierKind,

    /// Key to store the model under
    #[arg(short, long, default_value = "latest")]
    pub key: ModelKey,

    /// Number of cross-validation folds
    #[arg(long)]
    pub folds: Option<usize>,

    /// Skip cross-validation before the final fit
    #[arg(long)]
    pub no_cross_validate: bool,

    /// Keep cached entries and the full weight history
    #[arg(long)]
    pub no_optimize: bool,
}

/// Arguments for classification
#[derive(Parser, Debug, Clone)]
pub struct ClassifyArgs {
    /// Key of the model to use
    #[arg(short, long, default_value = "latest")]
    pub key: ModelKey,

    /// Comment text to classify (repeatable)
    #[arg(short, long = "text", value_name = "TEXT")]
    pub texts: Vec<String>,

    /// JSONL file of comments to classify; labels, when present, are
    /// reported next to the prediction
    #[arg(short, long, value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Store the model afterwards (Passive-Aggressive models learn from
    /// every classification)
    #[arg(long)]
    pub persist: bool,
}

/// Arguments for online updates
#[derive(Parser, Debug, Clone)]
pub struct UpdateArgs {
    /// Key of the model to update
    #[arg(short, long, default_value = "latest")]
    pub key: ModelKey,

    /// True label of the comment
    #[arg(short, long)]
    pub label: Label,

    /// Replay from this training step instead of the latest one
    #[arg(short, long)]
    pub step: Option<usize>,

    /// Comment text
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Arguments for reports
#[derive(Parser, Debug, Clone)]
pub struct ReportArgs {
    /// Key of the model to summarize
    #[arg(short, long, default_value = "latest")]
    pub key: ModelKey,
}

/// Arguments for cross-validation
#[derive(Parser, Debug, Clone)]
pub struct CrossValidateArgs {
    /// Labeled corpus (JSONL with id, content and label)
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Classifier algorithm (naive-bayes or pa)
    #[arg(short = 'a', long, default_value = "naive_bayes")]
    pub algorithm: ClassifierKind,

    /// Number of folds
    #[arg(long)]
    pub folds: Option<usize>,

    /// Build folds ignoring labels
    #[arg(long)]
    pub unstratified: bool,
}

/// Arguments for listing models
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Show envelope details
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for deleting a model
#[derive(Parser, Debug, Clone)]
pub struct DeleteArgs {
    /// Key of the model to delete
    #[arg(value_name = "KEY")]
    pub key: ModelKey,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
