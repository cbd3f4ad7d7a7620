//! In-memory repository.

use std::sync::RwLock;

use crate::error::{ConverterError, ConverterResult};

use super::{Keyed, Repository, insert_into, remove_from, upsert_into};

/// A repository held entirely in memory. Used by tests and by callers that
/// load records from elsewhere.
#[derive(Debug, Default)]
pub struct MemoryRepository<T> {
    records: RwLock<Vec<T>>,
}

impl<T> MemoryRepository<T> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Creates a repository pre-filled with records.
    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

fn poisoned() -> ConverterError {
    ConverterError::Storage {
        path: "memory".to_string(),
        message: "lock poisoned".to_string(),
    }
}

impl<T: Keyed + Clone + Send + Sync> Repository<T> for MemoryRepository<T> {
    fn list(&self) -> ConverterResult<Vec<T>> {
        Ok(self.records.read().map_err(|_| poisoned())?.clone())
    }

    fn get(&self, key: &str) -> ConverterResult<Option<T>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.iter().find(|record| record.key() == key).cloned())
    }

    fn upsert(&self, record: T) -> ConverterResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        upsert_into(&mut records, record);
        Ok(())
    }

    fn insert(&self, record: T) -> ConverterResult<bool> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(insert_into(&mut records, record))
    }

    fn delete(&self, key: &str) -> ConverterResult<bool> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(remove_from(&mut records, key))
    }

    fn transact(
        &self,
        change: &mut dyn FnMut(&mut Vec<T>) -> ConverterResult<()>,
    ) -> ConverterResult<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let mut working = records.clone();
        change(&mut working)?;
        *records = working;
        Ok(())
    }
}
