//! Command implementations for the scutum CLI.

use std::sync::Arc;
use std::time::Instant;

use crate::classifier::{Classifier, ClassifierKind, Model};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ScutumConfig;
use crate::corpus::{DocumentStore, JsonlDocumentStore};
use crate::engine::{ClassifyRequest, SpamFilter};
use crate::error::{Result, ScutumError};
use crate::feature::TrainingSetBuilder;
use crate::feature::extractor::FeatureExtractor;
use crate::store::{FileModelStore, ModelStore};

/// Execute a CLI command.
pub fn execute_command(args: ScutumArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Classify(classify_args) => classify(classify_args.clone(), &args),
        Command::Update(update_args) => update(update_args.clone(), &args),
        Command::Report(report_args) => report(report_args.clone(), &args),
        Command::CrossValidate(cv_args) => cross_validate(cv_args.clone(), &args),
        Command::List(list_args) => list_models(list_args.clone(), &args),
        Command::Delete(delete_args) => delete_model(delete_args.clone(), &args),
    }
}

fn load_config(cli_args: &ScutumArgs) -> Result<ScutumConfig> {
    match &cli_args.config {
        Some(path) => {
            log::debug!("Loading configuration from {}", path.display());
            ScutumConfig::from_file(path)
        }
        None => Ok(ScutumConfig::default()),
    }
}

fn open_store(cli_args: &ScutumArgs) -> Result<Arc<FileModelStore>> {
    Ok(Arc::new(FileModelStore::new(&cli_args.models)?))
}

fn open_filter(config: ScutumConfig, cli_args: &ScutumArgs) -> Result<SpamFilter> {
    let store: Arc<dyn ModelStore> = open_store(cli_args)?;
    SpamFilter::new(config, store)
}

/// Train and store a model.
fn train(args: TrainArgs, cli_args: &ScutumArgs) -> Result<()> {
    let mut config = load_config(cli_args)?;
    if let Some(folds) = args.folds {
        config.cross_validation.folds = folds;
    }
    if args.no_cross_validate {
        config.training.cross_validate = false;
    }
    if args.no_optimize {
        config.training.optimize = false;
    }

    let corpus = JsonlDocumentStore::new(&args.corpus);
    let stats = corpus.stats()?;
    log::info!(
        "Corpus {}: {} documents, {} spam, {} not spam, {} unlabeled",
        args.corpus.display(),
        stats.total,
        stats.spam,
        stats.not_spam,
        stats.unlabeled
    );

    let filter = open_filter(config, cli_args)?;
    let start_time = Instant::now();
    let report = filter.build_model_from_store(args.algorithm, &corpus, &args.key)?;
    let duration = start_time.elapsed();

    output_result(
        "Model trained successfully",
        &TrainResult {
            key: args.key,
            documents: stats.spam + stats.not_spam,
            duration_ms: duration.as_millis() as u64,
            report,
        },
        cli_args,
    )
}

/// Classify comments from the command line and/or a JSONL file.
fn classify(args: ClassifyArgs, cli_args: &ScutumArgs) -> Result<()> {
    let mut requests: Vec<ClassifyRequest> =
        args.texts.iter().map(ClassifyRequest::new).collect();
    if let Some(input) = &args.input {
        for document in JsonlDocumentStore::new(input).find_all()? {
            let request = ClassifyRequest::new(document.content);
            requests.push(match document.label {
                Some(label) => request.with_label(label),
                None => request,
            });
        }
    }
    if requests.is_empty() {
        return Err(ScutumError::invalid_argument(
            "Nothing to classify: pass --text or --input",
        ));
    }

    let filter = open_filter(load_config(cli_args)?, cli_args)?;
    filter.load_model(&args.key)?;
    let classifications = filter.classify(&requests)?;
    if args.persist {
        filter.save()?;
    }

    let results = requests
        .into_iter()
        .zip(classifications)
        .map(|(request, classification)| ClassifiedComment {
            content: request.content,
            classification,
        })
        .collect();

    output_result(
        "Classification complete",
        &ClassifyResults::new(args.key, results),
        cli_args,
    )
}

/// Teach a stored model one labeled comment.
fn update(args: UpdateArgs, cli_args: &ScutumArgs) -> Result<()> {
    let filter = open_filter(load_config(cli_args)?, cli_args)?;
    let kind = filter.load_model(&args.key)?;
    if kind != ClassifierKind::PassiveAggressive {
        return Err(ScutumError::InvalidOperation(format!(
            "Model {} is {kind}; only passive aggressive models learn online",
            args.key
        )));
    }

    let prediction = filter.update(&args.text, args.label, args.step)?;
    let latest_step = filter.latest_step().unwrap_or_default();

    output_result(
        "Model updated",
        &UpdateResult {
            key: args.key,
            label: args.label,
            predicted: prediction.label,
            loss: prediction.confidence,
            latest_step,
        },
        cli_args,
    )
}

/// Show the summary of a stored model.
fn report(args: ReportArgs, cli_args: &ScutumArgs) -> Result<()> {
    let store = open_store(cli_args)?;
    let model = store.load(&args.key)?;
    output_result(
        &format!("Model {}", args.key),
        &crate::report::report(&model),
        cli_args,
    )
}

/// Cross-validate a classifier on a corpus without storing a model.
fn cross_validate(args: CrossValidateArgs, cli_args: &ScutumArgs) -> Result<()> {
    let config = load_config(cli_args)?;
    config.validate()?;
    let folds = args.folds.unwrap_or(config.cross_validation.folds);
    let stratified = !args.unstratified;

    let documents = JsonlDocumentStore::new(&args.corpus).training_documents()?;
    let builder = TrainingSetBuilder::new(FeatureExtractor::from_config(&config.extraction)?);
    let training_set = builder.build(&documents)?;

    let mut model = Model::new(args.algorithm, &config.classifier);
    model.train(training_set)?;

    let start_time = Instant::now();
    let statistics = model.cross_validate(folds, stratified)?;
    let duration = start_time.elapsed();

    output_result(
        "Cross-validation complete",
        &CrossValidationResult {
            kind: args.algorithm,
            folds,
            stratified,
            duration_ms: duration.as_millis() as u64,
            statistics,
        },
        cli_args,
    )
}

/// List stored models.
fn list_models(args: ListArgs, cli_args: &ScutumArgs) -> Result<()> {
    let store = open_store(cli_args)?;
    let mut models = Vec::new();
    for key in store.keys()? {
        let info = if args.detailed {
            match store.info(&key) {
                Ok(info) => Some(info),
                Err(e) => {
                    log::warn!("Cannot read envelope of model {key}: {e}");
                    None
                }
            }
        } else {
            None
        };
        models.push(ModelEntry { key, info });
    }

    output_result(
        "Stored models",
        &ListResult {
            directory: store.directory().to_string_lossy().to_string(),
            models,
        },
        cli_args,
    )
}

/// Delete a stored model.
fn delete_model(args: DeleteArgs, cli_args: &ScutumArgs) -> Result<()> {
    let store = open_store(cli_args)?;
    store.delete(&args.key)?;
    log::info!("Deleted model {}", args.key);
    output_result("Model deleted", &DeleteResult { key: args.key }, cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;
    use crate::label::Label;
    use crate::store::ModelKey;
    use clap::Parser;
    use tempfile::TempDir;

    fn write_corpus(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("corpus.jsonl");
        let mut documents = Vec::new();
        for i in 0..5 {
            documents.push(Document::new(
                i * 2,
                "cheap pills cheap pills cheap pills",
                Some(Label::Spam),
            ));
            documents.push(Document::new(
                i * 2 + 1,
                "meeting notes meeting notes meeting notes",
                Some(Label::NotSpam),
            ));
        }
        JsonlDocumentStore::write_all(&path, &documents).unwrap();
        path
    }

    fn run(dir: &TempDir, rest: &[&str]) -> Result<()> {
        let models = dir.path().join("models");
        let mut argv = vec!["scutum", "-q", "-f", "json", "--models"];
        argv.push(models.to_str().unwrap());
        argv.extend_from_slice(rest);
        execute_command(ScutumArgs::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_train_update_delete() {
        let dir = TempDir::new().unwrap();
        let corpus = write_corpus(&dir);
        let corpus = corpus.to_str().unwrap();

        run(&dir, &["train", corpus, "-a", "pa", "-k", "online", "--folds", "5"]).unwrap();
        let store = FileModelStore::new(dir.path().join("models")).unwrap();
        let key = ModelKey::name("online").unwrap();
        assert!(store.contains(&key));

        run(&dir, &["update", "-k", "online", "-l", "spam", "cheap pills"]).unwrap();
        run(&dir, &["classify", "-k", "online", "-t", "cheap pills", "--persist"]).unwrap();
        run(&dir, &["report", "-k", "online"]).unwrap();
        run(&dir, &["list", "--detailed"]).unwrap();

        run(&dir, &["delete", "online"]).unwrap();
        assert!(!store.contains(&key));
        assert!(run(&dir, &["delete", "online"]).is_err());
    }

    #[test]
    fn test_update_rejects_naive_bayes() {
        let dir = TempDir::new().unwrap();
        let corpus = write_corpus(&dir);

        run(&dir, &["train", corpus.to_str().unwrap(), "--no-cross-validate"]).unwrap();
        assert!(run(&dir, &["update", "-l", "spam", "cheap"]).is_err());
    }

    #[test]
    fn test_classify_requires_input() {
        let dir = TempDir::new().unwrap();
        assert!(run(&dir, &["classify"]).is_err());
    }

    #[test]
    fn test_cross_validate_command() {
        let dir = TempDir::new().unwrap();
        let corpus = write_corpus(&dir);

        run(&dir, &["cross-validate", corpus.to_str().unwrap(), "--folds", "5"]).unwrap();
        run(&dir, &["cross-validate", corpus.to_str().unwrap(), "--unstratified"]).unwrap();
    }
}
