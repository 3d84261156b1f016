use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::text::{ExpertiseAreas, PersonalIdentifier, RegionName};

/// Whether an identity has a stored profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Registered,
    NotRegistered,
}

impl RegistrationStatus {
    pub fn from_exists(exists: bool) -> Self {
        if exists {
            Self::Registered
        } else {
            Self::NotRegistered
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "Registered",
            Self::NotRegistered => "Not Registered",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier, region and number of expertise areas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub identifier: PersonalIdentifier,
    pub region: RegionName,
    pub expertise_count: usize,
}

impl From<&Record> for ProfileSummary {
    fn from(record: &Record) -> Self {
        Self {
            identifier: record.personal_identifier().clone(),
            region: record.base_region().clone(),
            expertise_count: record.expertise_areas().len(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionExpertise {
    pub region: RegionName,
    pub expertise: ExpertiseAreas,
}

impl From<&Record> for RegionExpertise {
    fn from(record: &Record) -> Self {
        Self {
            region: record.base_region().clone(),
            expertise: record.expertise_areas().clone(),
        }
    }
}

/// Every field of a profile, under the short view names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullProfile {
    pub identifier: PersonalIdentifier,
    pub region: RegionName,
    pub expertise: ExpertiseAreas,
    pub capacity: u64,
}

impl From<&Record> for FullProfile {
    fn from(record: &Record) -> Self {
        Self {
            identifier: record.personal_identifier().clone(),
            region: record.base_region().clone(),
            expertise: record.expertise_areas().clone(),
            capacity: record.weekly_capacity(),
        }
    }
}
