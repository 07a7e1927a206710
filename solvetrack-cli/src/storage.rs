//! Durable key-value store backed by a single JSON file.
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::{Map, Value};
use solvetrack_core::KeyValueStore;
use thiserror::Error;

/// Errors from the JSON-file store.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One JSON object file holding every key. Reads load the whole file;
/// writes rewrite it whole. A missing or unreadable file reads as empty,
/// so a corrupt data file degrades to a fresh start instead of an error.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<Map<String, Value>, FileStoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => {
                return Err(FileStoreError::Io {
                    path: self.path.display().to_string(),
                    source: err,
                });
            }
        };
        match serde_json::from_str(&text) {
            Ok(map) => Ok(map),
            Err(err) => {
                log::warn!(
                    "data file {} is unreadable, starting empty: {err}",
                    self.path.display()
                );
                Ok(Map::new())
            }
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<(), FileStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| FileStoreError::Io {
                    path: parent.display().to_string(),
                    source: err,
                })?;
            }
        }
        let text = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, text).map_err(|err| FileStoreError::Io {
            path: self.path.display().to_string(),
            source: err,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<Value>, Self::Error> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), Self::Error> {
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value.clone());
        self.write_all(&map)
    }
}
