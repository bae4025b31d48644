//! Raw document sources.
//!
//! The engine reads comments through the [`DocumentStore`] trait. A memory
//! store and a JSON Lines file store are provided; each line of a JSONL
//! corpus is one document:
//!
//! ```text
//! {"id": 1, "content": "free money www.spam.biz", "label": "spam"}
//! {"id": 2, "content": "see you at the meeting"}
//! ```

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScutumError};
use crate::feature::training_set::LabeledDocument;
use crate::label::Label;

/// A stored comment, labeled or not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl Document {
    pub fn new<S: Into<String>>(id: u64, content: S, label: Option<Label>) -> Self {
        Document {
            id,
            content: content.into(),
            label,
        }
    }

    /// Training input for labeled documents.
    pub fn to_labeled(&self) -> Option<LabeledDocument> {
        self.label
            .map(|label| LabeledDocument::new(label, self.content.clone()))
    }
}

/// Label distribution of a corpus.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CorpusStats {
    pub total: usize,
    pub spam: usize,
    pub not_spam: usize,
    pub unlabeled: usize,
}

impl CorpusStats {
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut stats = CorpusStats {
            total: documents.len(),
            ..Default::default()
        };
        for document in documents {
            match document.label {
                Some(Label::Spam) => stats.spam += 1,
                Some(Label::NotSpam) => stats.not_spam += 1,
                None => stats.unlabeled += 1,
            }
        }
        stats
    }

    /// Fraction of labeled documents that are spam.
    pub fn spam_ratio(&self) -> f64 {
        let labeled = self.spam + self.not_spam;
        if labeled == 0 {
            0.0
        } else {
            self.spam as f64 / labeled as f64
        }
    }
}

/// Source of raw documents.
pub trait DocumentStore: Send + Sync {
    /// Every document, in store order.
    fn find_all(&self) -> Result<Vec<Document>>;

    /// One document by id.
    fn find_by_id(&self, id: u64) -> Result<Option<Document>>;

    /// Labeled documents as training input, in store order.
    fn training_documents(&self) -> Result<Vec<LabeledDocument>> {
        Ok(self
            .find_all()?
            .iter()
            .filter_map(Document::to_labeled)
            .collect())
    }

    fn stats(&self) -> Result<CorpusStats> {
        Ok(CorpusStats::from_documents(&self.find_all()?))
    }
}

/// Documents held in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        MemoryDocumentStore {
            documents: RwLock::new(documents),
        }
    }

    /// Add a document, replacing any document with the same id.
    pub fn insert(&self, document: Document) {
        let mut documents = self.documents.write();
        match documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
    }

    /// Set or clear the label of a document. Returns whether it exists.
    pub fn set_label(&self, id: u64, label: Option<Label>) -> bool {
        let mut documents = self.documents.write();
        match documents.iter_mut().find(|d| d.id == id) {
            Some(document) => {
                document.label = label;
                true
            }
            None => false,
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn find_all(&self) -> Result<Vec<Document>> {
        Ok(self.documents.read().clone())
    }

    fn find_by_id(&self, id: u64) -> Result<Option<Document>> {
        Ok(self.documents.read().iter().find(|d| d.id == id).cloned())
    }
}

/// Documents read from a JSON Lines file.
///
/// The file is read on every call, so edits made by other tools are picked
/// up. Blank lines are ignored.
#[derive(Debug, Clone)]
pub struct JsonlDocumentStore {
    path: PathBuf,
}

impl JsonlDocumentStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonlDocumentStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write documents to a JSON Lines file, replacing its contents.
    pub fn write_all<P: AsRef<Path>>(path: P, documents: &[Document]) -> Result<()> {
        let mut file = fs::File::create(path.as_ref())?;
        for document in documents {
            serde_json::to_writer(&mut file, document)?;
            file.write_all(b"\n")?;
        }
        file.sync_all()?;
        Ok(())
    }

    /// Parse JSON Lines text. Line numbers in errors are 1-based.
    pub fn parse<R: BufRead>(reader: R) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let document: Document = serde_json::from_str(&line).map_err(|e| {
                ScutumError::serialization(format!("line {}: {e}", number + 1))
            })?;
            documents.push(document);
        }
        Ok(documents)
    }
}

impl DocumentStore for JsonlDocumentStore {
    fn find_all(&self) -> Result<Vec<Document>> {
        let file = fs::File::open(&self.path).map_err(|e| {
            ScutumError::storage(format!("Failed to open {}: {e}", self.path.display()))
        })?;
        Self::parse(BufReader::new(file))
    }

    fn find_by_id(&self, id: u64) -> Result<Option<Document>> {
        Ok(self.find_all()?.into_iter().find(|d| d.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents() -> Vec<Document> {
        vec![
            Document::new(1, "free money", Some(Label::Spam)),
            Document::new(2, "meeting notes", Some(Label::NotSpam)),
            Document::new(3, "who knows", None),
        ]
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryDocumentStore::from_documents(documents());

        assert_eq!(store.find_all().unwrap().len(), 3);
        assert_eq!(store.find_by_id(2).unwrap().unwrap().content, "meeting notes");
        assert!(store.find_by_id(9).unwrap().is_none());

        assert!(store.set_label(3, Some(Label::Spam)));
        assert_eq!(store.training_documents().unwrap().len(), 3);
    }

    #[test]
    fn test_stats() {
        let store = MemoryDocumentStore::from_documents(documents());
        let stats = store.stats().unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.spam, 1);
        assert_eq!(stats.unlabeled, 1);
        assert_eq!(stats.spam_ratio(), 0.5);
    }

    #[test]
    fn test_parse_jsonl() {
        let text = "{\"id\": 1, \"content\": \"a\", \"label\": \"spam\"}\n\n{\"id\": 2, \"content\": \"b\"}\n";
        let documents = JsonlDocumentStore::parse(text.as_bytes()).unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].label, Some(Label::Spam));
        assert_eq!(documents[1].label, None);
    }

    #[test]
    fn test_parse_reports_line() {
        let text = "{\"id\": 1, \"content\": \"a\"}\nnot json\n";
        let error = JsonlDocumentStore::parse(text.as_bytes()).unwrap_err();
        assert!(error.to_string().contains("line 2"));
    }

    #[test]
    fn test_jsonl_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("comments.jsonl");
        JsonlDocumentStore::write_all(&path, &documents()).unwrap();

        let store = JsonlDocumentStore::new(&path);
        assert_eq!(store.find_all().unwrap(), documents());
        assert_eq!(store.find_by_id(3).unwrap().unwrap().label, None);
    }
}
