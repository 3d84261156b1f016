//! The [`TalentStore`] trait defining the storage interface.

use tal_types::{CallerId, Record};

use crate::error::Result;

/// Precondition for [`TalentStore::put_if`] on the caller's existing record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    /// No record may exist yet (registration).
    Absent,
    /// A record must already exist (replacement).
    Present,
}

impl Presence {
    pub fn holds(self, exists: bool) -> bool {
        match self {
            Self::Absent => !exists,
            Self::Present => exists,
        }
    }
}

/// Storage backend for talent records.
///
/// Implementations must be thread-safe (`Send + Sync`) and make each `put`
/// visible atomically: a reader sees either the previous record or the new
/// one, never a mix of the two.
pub trait TalentStore: Send + Sync {
    /// Read the record stored for `caller`.
    ///
    /// Returns `Ok(None)` if the caller is not registered.
    fn get(&self, caller: &CallerId) -> Result<Option<Record>>;

    /// Store `record` for `caller`, replacing any previous record in full.
    fn put(&self, caller: &CallerId, record: &Record) -> Result<()>;

    /// Store `record` for `caller` only if `expect` holds for the current
    /// state, checked and written as one step. Returns whether it was written.
    ///
    /// The default checks with `contains` and then calls `put`, which is only
    /// atomic when the caller serializes writes itself. Stores shared between
    /// processes must override it.
    fn put_if(&self, caller: &CallerId, record: &Record, expect: Presence) -> Result<bool> {
        if !expect.holds(self.contains(caller)?) {
            return Ok(false);
        }
        self.put(caller, record)?;
        Ok(true)
    }

    /// Whether a record exists for `caller`.
    fn contains(&self, caller: &CallerId) -> Result<bool> {
        Ok(self.get(caller)?.is_some())
    }
}
