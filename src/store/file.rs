//! Directory-backed model store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScutumError};
use crate::store::{ModelKey, ModelStore};

/// File extension of stored envelopes.
pub const MODEL_EXTENSION: &str = "model";

/// Stores each model as `<key>.model` inside one directory.
///
/// Writes go to a temporary file in the same directory that is synced and
/// then renamed over the target, so readers never observe a partial model.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    directory: PathBuf,
}

impl FileModelStore {
    /// Open a store, creating the directory when missing.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| {
                ScutumError::storage(format!(
                    "Failed to create model directory {}: {e}",
                    directory.display()
                ))
            })?;
        }
        Ok(FileModelStore { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &ModelKey) -> PathBuf {
        self.directory.join(format!("{key}.{MODEL_EXTENSION}"))
    }

    fn temp_path_for(&self, key: &ModelKey) -> PathBuf {
        self.directory
            .join(format!(".{key}.{}.tmp", std::process::id()))
    }
}

impl ModelStore for FileModelStore {
    fn write_blob(&self, key: &ModelKey, blob: &[u8]) -> Result<()> {
        let temp_path = self.temp_path_for(key);
        let target = self.path_for(key);

        let write = || -> Result<()> {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(blob)?;
            file.sync_all()?;
            fs::rename(&temp_path, &target)?;
            Ok(())
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ScutumError::storage(format!("Failed to write {}: {e}", target.display()))
        })
    }

    fn read_blob(&self, key: &ModelKey) -> Result<Vec<u8>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScutumError::model_not_found(key.to_string()))
            }
            Err(e) => Err(ScutumError::storage(format!(
                "Failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn contains(&self, key: &ModelKey) -> bool {
        self.path_for(key).is_file()
    }

    fn delete(&self, key: &ModelKey) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScutumError::model_not_found(key.to_string()))
            }
            Err(e) => Err(ScutumError::storage(format!(
                "Failed to delete {}: {e}",
                path.display()
            ))),
        }
    }

    fn keys(&self) -> Result<Vec<ModelKey>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION)
            {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match stem.parse::<ModelKey>() {
                Ok(key) => keys.push(key),
                Err(_) => log::warn!("Skipping unrecognised model file {}", path.display()),
            }
        }
        keys.sort();
        Ok(keys)
    }
}
