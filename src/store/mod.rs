//! Record storage for the Leave Converter.
//!
//! Roster and credential data live behind the [`Repository`] trait so the
//! services above it do not depend on where records are kept.

mod json_file;
mod memory;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;

use crate::error::ConverterResult;
use crate::models::{Employee, UserAccount};

/// A record with a unique string key.
pub trait Keyed {
    /// The record's unique key.
    fn key(&self) -> &str;
}

impl Keyed for Employee {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for UserAccount {
    fn key(&self) -> &str {
        &self.username
    }
}

/// Keyed record storage.
///
/// Implementations keep records in insertion order; `upsert` of an existing
/// key replaces the record in place.
pub trait Repository<T: Keyed>: Send + Sync {
    /// Returns every record.
    fn list(&self) -> ConverterResult<Vec<T>>;

    /// Returns the record with the given key, if any.
    fn get(&self, key: &str) -> ConverterResult<Option<T>>;

    /// Inserts a record, replacing any record with the same key.
    fn upsert(&self, record: T) -> ConverterResult<()>;

    /// Inserts a record only if its key is unused. Returns false, leaving the
    /// collection unchanged, if the key is taken.
    fn insert(&self, record: T) -> ConverterResult<bool>;

    /// Runs `change` against the whole collection while holding the write
    /// lock. Changes are kept only if `change` returns `Ok`.
    fn transact(
        &self,
        change: &mut dyn FnMut(&mut Vec<T>) -> ConverterResult<()>,
    ) -> ConverterResult<()>;

    /// Removes a record. Returns false if no record had the key.
    fn delete(&self, key: &str) -> ConverterResult<bool>;
}

/// Replaces the record with a matching key, or appends it.
pub(crate) fn upsert_into<T: Keyed>(records: &mut Vec<T>, record: T) {
    match records.iter_mut().find(|existing| existing.key() == record.key()) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Appends the record unless its key is already present.
pub(crate) fn insert_into<T: Keyed>(records: &mut Vec<T>, record: T) -> bool {
    if records.iter().any(|existing| existing.key() == record.key()) {
        return false;
    }
    records.push(record);
    true
}

/// Removes the record with a matching key.
pub(crate) fn remove_from<T: Keyed>(records: &mut Vec<T>, key: &str) -> bool {
    let before = records.len();
    records.retain(|record| record.key() != key);
    records.len() != before
}
