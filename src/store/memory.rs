//! In-memory model store.

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{Result, ScutumError};
use crate::store::{ModelKey, ModelStore};

/// Keeps encoded envelopes in a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryModelStore {
    blobs: RwLock<AHashMap<ModelKey, Vec<u8>>>,
}

impl MemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored models.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }

    /// Total envelope bytes held.
    pub fn total_size(&self) -> u64 {
        self.blobs.read().values().map(|blob| blob.len() as u64).sum()
    }
}

impl ModelStore for MemoryModelStore {
    fn write_blob(&self, key: &ModelKey, blob: &[u8]) -> Result<()> {
        self.blobs.write().insert(key.clone(), blob.to_vec());
        Ok(())
    }

    fn read_blob(&self, key: &ModelKey) -> Result<Vec<u8>> {
        self.blobs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ScutumError::model_not_found(key.to_string()))
    }

    fn contains(&self, key: &ModelKey) -> bool {
        self.blobs.read().contains_key(key)
    }

    fn delete(&self, key: &ModelKey) -> Result<()> {
        self.blobs
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| ScutumError::model_not_found(key.to_string()))
    }

    fn keys(&self) -> Result<Vec<ModelKey>> {
        let mut keys: Vec<ModelKey> = self.blobs.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
