use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tal_store::{Presence, StoreError, TalentStore};
use tal_types::{
    CallerId, ExpertiseAreas, FullProfile, PersonalIdentifier, ProfileSubmission, ProfileSummary,
    Record, RegionExpertise, RegionName, RegistrationStatus,
};
use tracing::{debug, info, warn};

use crate::context::CallerContext;
use crate::error::{RegistryError, RegistryResult};
use crate::validator::validate;

/// Successful outcome of a write operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confirmation {
    Created,
    Updated,
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Created => "Talent profile registered",
            Self::Updated => "Talent profile updated",
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The talent registry.
///
/// Write operations are keyed by the caller in the [`CallerContext`] and are
/// serialized through a commit lock held from the existence check to the
/// store write. The write itself is a [`TalentStore::put_if`], so a store
/// shared with another process cannot be overwritten between the check and
/// the write. Reads go straight to the store.
pub struct TalentRegistry {
    store: Arc<dyn TalentStore>,
    commit_lock: Mutex<()>,
}

impl TalentRegistry {
    pub fn new(store: Arc<dyn TalentStore>) -> Self {
        Self {
            store,
            commit_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn TalentStore> {
        &self.store
    }

    fn commit_guard(&self) -> RegistryResult<MutexGuard<'_, ()>> {
        self.commit_lock
            .lock()
            .map_err(|e| RegistryError::Store(StoreError::LockPoisoned(e.to_string())))
    }

    // ---- Write operations ----

    /// Register the caller's profile.
    ///
    /// Fails with `DuplicateEntry` if the caller is already registered and
    /// with `CapacityInvalid` if the submission is incomplete. The store is
    /// untouched on failure.
    pub fn create(
        &self,
        ctx: &CallerContext,
        submission: ProfileSubmission,
    ) -> RegistryResult<Confirmation> {
        let caller = ctx.caller();
        let _commit = self.commit_guard()?;

        if self.store.contains(caller)? {
            warn!(caller = %caller, code = RegistryError::DUPLICATE_ENTRY, "create rejected: already registered");
            return Err(RegistryError::DuplicateEntry);
        }

        let record = validate(submission).inspect_err(|e| {
            warn!(caller = %caller, code = e.code(), "create rejected: invalid profile");
        })?;
        if !self.store.put_if(caller, &record, Presence::Absent)? {
            warn!(caller = %caller, code = RegistryError::DUPLICATE_ENTRY, "create rejected: registered concurrently");
            return Err(RegistryError::DuplicateEntry);
        }

        info!(caller = %caller, expertise = record.expertise_areas().len(), "talent profile registered");
        Ok(Confirmation::Created)
    }

    /// Replace the caller's profile in full.
    ///
    /// Fails with `RecordMissing` if the caller is not registered (whatever
    /// the submission contains) and with `CapacityInvalid` if the submission
    /// is incomplete, leaving the existing record as it was.
    pub fn modify(
        &self,
        ctx: &CallerContext,
        submission: ProfileSubmission,
    ) -> RegistryResult<Confirmation> {
        let caller = ctx.caller();
        let _commit = self.commit_guard()?;

        if !self.store.contains(caller)? {
            warn!(caller = %caller, code = RegistryError::RECORD_MISSING, "modify rejected: not registered");
            return Err(RegistryError::RecordMissing);
        }

        let record = validate(submission).inspect_err(|e| {
            warn!(caller = %caller, code = e.code(), "modify rejected: invalid profile");
        })?;
        if !self.store.put_if(caller, &record, Presence::Present)? {
            warn!(caller = %caller, code = RegistryError::RECORD_MISSING, "modify rejected: record vanished");
            return Err(RegistryError::RecordMissing);
        }

        info!(caller = %caller, expertise = record.expertise_areas().len(), "talent profile updated");
        Ok(Confirmation::Updated)
    }

    // ---- Read operations ----

    fn lookup(&self, id: &CallerId) -> RegistryResult<Record> {
        match self.store.get(id)? {
            Some(record) => Ok(record),
            None => {
                debug!(caller = %id, "lookup of unregistered identity");
                Err(RegistryError::RecordMissing)
            }
        }
    }

    pub fn fetch_record(&self, id: &CallerId) -> RegistryResult<Record> {
        self.lookup(id)
    }

    pub fn fetch_identifier(&self, id: &CallerId) -> RegistryResult<PersonalIdentifier> {
        Ok(self.lookup(id)?.personal_identifier().clone())
    }

    pub fn fetch_region(&self, id: &CallerId) -> RegistryResult<RegionName> {
        Ok(self.lookup(id)?.base_region().clone())
    }

    pub fn fetch_expertise(&self, id: &CallerId) -> RegistryResult<ExpertiseAreas> {
        Ok(self.lookup(id)?.expertise_areas().clone())
    }

    pub fn fetch_capacity(&self, id: &CallerId) -> RegistryResult<u64> {
        Ok(self.lookup(id)?.weekly_capacity())
    }

    pub fn count_expertise(&self, id: &CallerId) -> RegistryResult<usize> {
        Ok(self.lookup(id)?.expertise_areas().len())
    }

    /// Whether `id` is registered. Only fails if the store itself fails.
    pub fn exists(&self, id: &CallerId) -> RegistryResult<bool> {
        Ok(self.store.contains(id)?)
    }

    /// `Registered` / `Not Registered`. Absence is an answer, not an error.
    pub fn registration_status(&self, id: &CallerId) -> RegistryResult<RegistrationStatus> {
        Ok(RegistrationStatus::from_exists(self.exists(id)?))
    }

    /// Always `true` for a registered identity, since a stored record has at
    /// least one expertise area.
    pub fn validate_expertise_nonempty(&self, id: &CallerId) -> RegistryResult<bool> {
        Ok(!self.lookup(id)?.expertise_areas().is_empty())
    }

    pub fn summary(&self, id: &CallerId) -> RegistryResult<ProfileSummary> {
        Ok(ProfileSummary::from(&self.lookup(id)?))
    }

    pub fn region_and_expertise(&self, id: &CallerId) -> RegistryResult<RegionExpertise> {
        Ok(RegionExpertise::from(&self.lookup(id)?))
    }

    pub fn full_profile(&self, id: &CallerId) -> RegistryResult<FullProfile> {
        Ok(FullProfile::from(&self.lookup(id)?))
    }
}

impl fmt::Debug for TalentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TalentRegistry").finish_non_exhaustive()
    }
}
