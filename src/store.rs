//! Model persistence.
//!
//! Trained classifiers are written through the [`ModelStore`] trait as
//! versioned envelopes (see [`codec`]). Two backends are provided:
//!
//! - [`MemoryModelStore`]: keeps envelopes in a map, for tests and
//!   short-lived processes.
//! - [`FileModelStore`]: one `<key>.model` file per model in a directory,
//!   written to a temporary file and renamed into place.
//!
//! # Example
//!
//! ```
//! use scutum::classifier::{ClassifierKind, Model};
//! use scutum::config::ClassifierConfig;
//! use scutum::store::{ModelKey, ModelStore, StoreConfig, StoreFactory};
//!
//! # fn main() -> scutum::error::Result<()> {
//! let store = StoreFactory::create(StoreConfig::Memory)?;
//! let model = Model::new(ClassifierKind::NaiveBayes, &ClassifierConfig::default());
//!
//! let key = ModelKey::Id(1);
//! store.save(&key, &model)?;
//! assert_eq!(store.load(&key)?, model);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classifier::{Classifier, ClassifierKind, Model};
use crate::error::{Result, ScutumError};

pub mod codec;
pub mod file;
pub mod memory;

pub use self::file::FileModelStore;
pub use self::memory::MemoryModelStore;

lazy_static! {
    static ref KEY_NAME_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]{0,127}$").expect("valid key pattern");
}

/// Identifier of a stored model: a number or a name.
///
/// Names made only of digits parse as numeric ids, so `"42"` and
/// `ModelKey::Id(42)` address the same model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelKey {
    Id(u64),
    Name(String),
}

impl ModelKey {
    /// A named key. Names are limited to ASCII letters, digits, `_`, `-`
    /// and `.`, and cannot start with `.` or `-`.
    pub fn name<S: Into<String>>(name: S) -> Result<Self> {
        let name = name.into();
        if let Ok(id) = name.parse::<u64>() {
            return Ok(ModelKey::Id(id));
        }
        if !KEY_NAME_PATTERN.is_match(&name) {
            return Err(ScutumError::invalid_argument(format!(
                "invalid model key '{name}'"
            )));
        }
        Ok(ModelKey::Name(name))
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKey::Id(id) => write!(f, "{id}"),
            ModelKey::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for ModelKey {
    type Err = ScutumError;

    fn from_str(s: &str) -> Result<Self> {
        ModelKey::name(s.trim())
    }
}

impl From<u64> for ModelKey {
    fn from(id: u64) -> Self {
        ModelKey::Id(id)
    }
}

/// Envelope metadata of a stored model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelInfo {
    pub key: ModelKey,
    pub kind: ClassifierKind,
    pub format_version: u16,
    pub saved_at: DateTime<Utc>,
    /// Envelope size in bytes.
    pub size: u64,
}

/// A keyed store of encoded models.
///
/// Backends implement raw blob access; encoding, decoding and metadata are
/// provided on top.
pub trait ModelStore: Send + Sync + fmt::Debug {
    /// Store an encoded envelope under `key`, replacing any previous one.
    fn write_blob(&self, key: &ModelKey, blob: &[u8]) -> Result<()>;

    /// Read the envelope stored under `key`.
    fn read_blob(&self, key: &ModelKey) -> Result<Vec<u8>>;

    /// Whether a model is stored under `key`.
    fn contains(&self, key: &ModelKey) -> bool;

    /// Remove the model stored under `key`.
    fn delete(&self, key: &ModelKey) -> Result<()>;

    /// Every stored key, sorted.
    fn keys(&self) -> Result<Vec<ModelKey>>;

    /// Encode and store a model.
    fn save(&self, key: &ModelKey, model: &Model) -> Result<()> {
        let blob = codec::encode(model)?;
        self.write_blob(key, &blob)?;
        log::info!("Saved {} model under key {} ({} bytes)", model.kind(), key, blob.len());
        Ok(())
    }

    /// Load and decode a model.
    fn load(&self, key: &ModelKey) -> Result<Model> {
        let blob = self.read_blob(key)?;
        let model = codec::decode(&blob)?;
        log::debug!("Loaded {} model from key {}", model.kind(), key);
        Ok(model)
    }

    /// Envelope metadata without decoding the payload.
    fn info(&self, key: &ModelKey) -> Result<ModelInfo> {
        let blob = self.read_blob(key)?;
        let header = codec::read_header(&blob)?;
        Ok(ModelInfo {
            key: key.clone(),
            kind: header.kind,
            format_version: header.version,
            saved_at: header.saved_at,
            size: blob.len() as u64,
        })
    }
}

/// Backend selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    File(PathBuf),
}

/// Builds model stores from a [`StoreConfig`].
pub struct StoreFactory;

impl StoreFactory {
    pub fn create(config: StoreConfig) -> Result<Arc<dyn ModelStore>> {
        match config {
            StoreConfig::Memory => Ok(Arc::new(MemoryModelStore::new())),
            StoreConfig::File(directory) => Ok(Arc::new(FileModelStore::new(directory)?)),
        }
    }
}
