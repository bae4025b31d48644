use std::fs;
use std::sync::Arc;

use scutum::classifier::ClassifierKind;
use scutum::config::ScutumConfig;
use scutum::corpus::{Document, JsonlDocumentStore};
use scutum::engine::{ClassifyRequest, SpamFilter};
use scutum::error::ScutumError;
use scutum::label::Label;
use scutum::store::{FileModelStore, ModelKey, ModelStore};
use tempfile::TempDir;

fn corpus() -> Vec<Document> {
    let mut documents = Vec::new();
    for i in 0..8 {
        documents.push(Document::new(
            i * 2,
            format!("cheap pills cheap pills cheap pills http://www.pills{i}.biz"),
            Some(Label::Spam),
        ));
        documents.push(Document::new(
            i * 2 + 1,
            "meeting notes meeting notes meeting notes tomorrow",
            Some(Label::NotSpam),
        ));
    }
    documents.push(Document::new(100, "unlabeled chatter", None));
    documents
}

fn requests() -> Vec<ClassifyRequest> {
    vec![
        ClassifyRequest::new("cheap pills cheap pills cheap pills www.deal.biz"),
        ClassifyRequest::new("meeting notes meeting notes meeting notes"),
        ClassifyRequest::new("nothing relevant here"),
    ]
}

fn store(dir: &TempDir) -> Arc<dyn ModelStore> {
    Arc::new(FileModelStore::new(dir.path().join("models")).unwrap())
}

#[test]
fn reloaded_model_classifies_identically() {
    let dir = TempDir::new().unwrap();
    let corpus_path = dir.path().join("corpus.jsonl");
    JsonlDocumentStore::write_all(&corpus_path, &corpus()).unwrap();
    let documents = JsonlDocumentStore::new(&corpus_path);

    for (id, kind) in ClassifierKind::ALL.into_iter().enumerate() {
        let key = ModelKey::Id(id as u64);
        let trainer = SpamFilter::new(ScutumConfig::default(), store(&dir)).unwrap();
        let report = trainer.build_model_from_store(kind, &documents, &key).unwrap();
        assert_eq!(report.instance_count, 16);

        let loader = SpamFilter::new(ScutumConfig::default(), store(&dir)).unwrap();
        assert_eq!(loader.load_model(&key).unwrap(), kind);

        let expected = trainer.classify(&requests()).unwrap();
        let actual = loader.classify(&requests()).unwrap();
        assert_eq!(expected, actual, "{kind}");
        if kind == ClassifierKind::NaiveBayes {
            assert_eq!(actual[0].label, Label::Spam);
            assert_eq!(actual[1].label, Label::NotSpam);
        }
    }
}

#[test]
fn corrupted_envelope_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file_store = FileModelStore::new(dir.path().join("models")).unwrap();
    let filter = SpamFilter::new(ScutumConfig::default(), Arc::new(file_store.clone())).unwrap();
    let training: Vec<_> = corpus().iter().filter_map(Document::to_labeled).collect();
    let key = ModelKey::name("nb").unwrap();
    filter
        .build_model(ClassifierKind::NaiveBayes, &training, &key)
        .unwrap();

    let path = file_store.directory().join("nb.model");
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&path, bytes).unwrap();

    assert!(file_store.load(&key).is_err());
    assert!(matches!(
        file_store.load(&ModelKey::Id(99)),
        Err(ScutumError::ModelNotFound(_))
    ));
}

#[test]
fn online_updates_survive_reload() {
    let dir = TempDir::new().unwrap();
    let training: Vec<_> = corpus().iter().filter_map(Document::to_labeled).collect();
    let key = ModelKey::name("online").unwrap();

    let filter = SpamFilter::new(ScutumConfig::default(), store(&dir)).unwrap();
    filter
        .build_model(ClassifierKind::PassiveAggressive, &training, &key)
        .unwrap();
    filter
        .update("cheap pills cheap pills cheap pills", Label::Spam, None)
        .unwrap();
    let step = filter.latest_step().unwrap();

    let reloaded = SpamFilter::new(ScutumConfig::default(), store(&dir)).unwrap();
    reloaded.load_model(&key).unwrap();
    assert_eq!(reloaded.latest_step(), Some(step));
    assert_eq!(reloaded.report().unwrap(), filter.report().unwrap());
}
