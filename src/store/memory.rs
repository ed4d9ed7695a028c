//! In-memory record store

use std::sync::Mutex;

use super::errors::{StoreError, StoreResult};
use super::{validate_principal, RecordStore};

/// Records held in process memory, in insertion order
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Mutex<Vec<(String, T)>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, Vec<(String, T)>>> {
        self.records
            .lock()
            .map_err(|_| StoreError::Internal("memory store lock poisoned".into()))
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send> RecordStore<T> for MemoryStore<T> {
    fn insert(&self, principal: &str, record: &T) -> StoreResult<()> {
        validate_principal(principal)?;
        self.lock()?.push((principal.to_string(), record.clone()));
        Ok(())
    }

    fn list(&self, principal: &str) -> StoreResult<Vec<T>> {
        validate_principal(principal)?;
        Ok(self
            .lock()?
            .iter()
            .filter(|(owner, _)| owner == principal)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn clear(&self, principal: &str) -> StoreResult<usize> {
        validate_principal(principal)?;
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|(owner, _)| owner != principal);
        Ok(before - records.len())
    }
}
