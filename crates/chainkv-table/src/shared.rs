//! Mutex-guarded table for callers that share one table across threads.
//!
//! [`SharedTable`] serializes every operation behind a single `Mutex`. A
//! resize rewrites the whole bucket array, so readers and writers take the
//! same lock.

use std::sync::{Mutex, MutexGuard};

use crate::error::{TableError, TableResult};
use crate::table::KeyValueTable;

/// A [`KeyValueTable`] behind one coarse-grained lock.
///
/// Lookups return owned copies because a borrow cannot outlive the guard.
#[derive(Debug)]
pub struct SharedTable {
    inner: Mutex<KeyValueTable>,
}

impl SharedTable {
    /// Wrap an existing table.
    pub fn new(table: KeyValueTable) -> Self {
        Self {
            inner: Mutex::new(table),
        }
    }

    /// Create a shared table with `capacity_hint` buckets (0 means default).
    pub fn with_capacity(capacity_hint: usize) -> TableResult<Self> {
        Ok(Self::new(KeyValueTable::with_capacity(capacity_hint)?))
    }

    fn lock(&self) -> TableResult<MutexGuard<'_, KeyValueTable>> {
        self.inner
            .lock()
            .map_err(|e| TableError::LockPoisoned(e.to_string()))
    }

    /// Insert or overwrite `key`.
    pub fn insert(&self, key: &str, value: &str) -> TableResult<()> {
        self.lock()?.insert(key, value)
    }

    /// Copy out the value stored for `key`.
    pub fn get(&self, key: &str) -> TableResult<Option<String>> {
        Ok(self.lock()?.get(key).map(str::to_owned))
    }

    /// Remove `key`; returns `true` if it was present.
    pub fn delete(&self, key: &str) -> TableResult<bool> {
        Ok(self.lock()?.delete(key))
    }

    /// Number of live entries.
    pub fn len(&self) -> TableResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> TableResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Snapshot every stored value.
    pub fn values(&self) -> TableResult<Vec<String>> {
        self.lock()?.values()
    }

    /// Run `f` against the table while holding the lock.
    pub fn with_table<R>(&self, f: impl FnOnce(&KeyValueTable) -> R) -> TableResult<R> {
        let guard = self.lock()?;
        Ok(f(&*guard))
    }

    /// Unwrap the inner table.
    pub fn into_inner(self) -> TableResult<KeyValueTable> {
        self.inner
            .into_inner()
            .map_err(|e| TableError::LockPoisoned(e.to_string()))
    }
}
