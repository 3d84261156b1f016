//! In-memory talent store for testing and ephemeral use.
//!
//! [`InMemoryTalentStore`] keeps all records in a `HashMap` protected by a
//! `RwLock`. Data is lost when the store is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use tal_types::{CallerId, Record};

use crate::error::{Result, StoreError};
use crate::traits::{Presence, TalentStore};

/// An in-memory implementation of [`TalentStore`].
#[derive(Debug, Default)]
pub struct InMemoryTalentStore {
    records: RwLock<HashMap<CallerId, Record>>,
}

impl InMemoryTalentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TalentStore for InMemoryTalentStore {
    fn get(&self, caller: &CallerId) -> Result<Option<Record>> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(records.get(caller).cloned())
    }

    fn put(&self, caller: &CallerId, record: &Record) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        records.insert(caller.clone(), record.clone());
        Ok(())
    }

    fn put_if(&self, caller: &CallerId, record: &Record, expect: Presence) -> Result<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        if !expect.holds(records.contains_key(caller)) {
            return Ok(false);
        }
        records.insert(caller.clone(), record.clone());
        Ok(true)
    }

    fn contains(&self, caller: &CallerId) -> Result<bool> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(records.contains_key(caller))
    }
}
