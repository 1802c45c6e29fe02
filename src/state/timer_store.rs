//! Concurrency-safe, strongly typed store keyed by user identifier
//!
//! Entries live until they are explicitly deleted. There is no TTL and no
//! background sweeping: the owner of the store decides when a record ends.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::error::{Result, TimerError};

/// Mutex-guarded map from user identifier to a record of type `V`
#[derive(Debug)]
pub struct TimerStore<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V> TimerStore<V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, V>>> {
        self.entries
            .lock()
            .map_err(|e| TimerError::Internal(format!("Failed to lock timer store: {}", e)))
    }

    /// Insert a record, returning the one it displaced (if any).
    ///
    /// The manager inserts through [`TimerStore::put_with`] instead, so a
    /// countdown armed for the record is created under the same lock.
    pub fn put(&self, id: impl Into<String>, record: V) -> Result<Option<V>> {
        Ok(self.lock()?.insert(id.into(), record))
    }

    /// Build and insert a record while holding the lock.
    ///
    /// Anything `make` sets in motion that needs the store (such as an
    /// expiry callback) observes the new record, never the displaced one.
    pub fn put_with<F>(&self, id: impl Into<String>, make: F) -> Result<Option<V>>
    where
        F: FnOnce() -> V,
    {
        let mut entries = self.lock()?;
        Ok(entries.insert(id.into(), make()))
    }

    /// Remove a record, returning it if it was present
    pub fn delete(&self, id: &str) -> Result<Option<V>> {
        Ok(self.lock()?.remove(id))
    }

    /// Read-modify-write a single record while holding the lock.
    ///
    /// Returns `Ok(None)` when no record exists for `id`.
    pub fn update<R, F>(&self, id: &str, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut V) -> R,
    {
        Ok(self.lock()?.get_mut(id).map(f))
    }

    /// Read a single record while holding the lock
    pub fn inspect<R, F>(&self, id: &str, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&V) -> R,
    {
        Ok(self.lock()?.get(id).map(f))
    }

    /// Remove the record only if `pred` holds for it
    pub fn remove_if<F>(&self, id: &str, pred: F) -> Result<Option<V>>
    where
        F: FnOnce(&V) -> bool,
    {
        let mut entries = self.lock()?;
        match entries.get(id) {
            Some(record) if pred(record) => Ok(entries.remove(id)),
            _ => Ok(None),
        }
    }

    /// Remove and return every record
    pub fn drain(&self) -> Result<Vec<(String, V)>> {
        Ok(self.lock()?.drain().collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}

impl<V: Clone> TimerStore<V> {
    /// Fetch a copy of the record stored under `id`.
    ///
    /// Only for cloneable records; timer records are read via
    /// [`TimerStore::inspect`].
    pub fn get(&self, id: &str) -> Result<Option<V>> {
        Ok(self.lock()?.get(id).cloned())
    }
}

impl<V> Default for TimerStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
