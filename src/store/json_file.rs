//! JSON file repository.
//!
//! The whole collection is stored as one JSON array. Every write reads the
//! current file, applies the change and replaces the file through a rename,
//! so readers never observe a half-written file.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ConverterError, ConverterResult};

use super::{Keyed, Repository, insert_into, remove_from, upsert_into};

/// A repository persisted to a JSON file.
///
/// A missing file reads as an empty collection and is created on first write.
#[derive(Debug)]
pub struct JsonFileRepository<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileRepository<T> {
    /// Creates a repository backed by `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, message: impl Into<String>) -> ConverterError {
        ConverterError::Storage {
            path: self.path.display().to_string(),
            message: message.into(),
        }
    }
}

impl<T: Serialize + DeserializeOwned> JsonFileRepository<T> {
    fn read_all(&self) -> ConverterResult<Vec<T>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.storage_error(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| self.storage_error(e.to_string()))
    }

    fn write_all(&self, records: &[T]) -> ConverterResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(records).map_err(|e| self.storage_error(e.to_string()))?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).map_err(|e| self.storage_error(e.to_string()))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.storage_error(e.to_string()))?;

        debug!(path = %self.path.display(), records = records.len(), "Saved repository");
        Ok(())
    }

    /// Read, change and rewrite under the write lock. Nothing is written when
    /// `change` fails.
    fn modify<R>(
        &self,
        change: impl FnOnce(&mut Vec<T>) -> ConverterResult<R>,
    ) -> ConverterResult<R> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| self.storage_error("lock poisoned"))?;
        let mut records = self.read_all()?;
        let outcome = change(&mut records)?;
        self.write_all(&records)?;
        Ok(outcome)
    }
}

impl<T> Repository<T> for JsonFileRepository<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned + Send + Sync,
{
    fn list(&self) -> ConverterResult<Vec<T>> {
        self.read_all()
    }

    fn get(&self, key: &str) -> ConverterResult<Option<T>> {
        Ok(self.read_all()?.into_iter().find(|record| record.key() == key))
    }

    fn upsert(&self, record: T) -> ConverterResult<()> {
        self.modify(|records| {
            upsert_into(records, record);
            Ok(())
        })
    }

    fn insert(&self, record: T) -> ConverterResult<bool> {
        self.modify(|records| Ok(insert_into(records, record)))
    }

    fn delete(&self, key: &str) -> ConverterResult<bool> {
        self.modify(|records| Ok(remove_from(records, key)))
    }

    fn transact(
        &self,
        change: &mut dyn FnMut(&mut Vec<T>) -> ConverterResult<()>,
    ) -> ConverterResult<()> {
        self.modify(|records| change(records))
    }
}
