use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::text::{ExpertiseAreas, PersonalIdentifier, RegionName};

/// Write input for a talent profile.
///
/// Field lengths are already bounded by the field types; completeness
/// (non-empty text, at least one expertise area, capacity of at least one
/// hour) is only checked when the submission is turned into a [`Record`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSubmission {
    pub personal_identifier: PersonalIdentifier,
    pub base_region: RegionName,
    pub expertise_areas: ExpertiseAreas,
    pub weekly_capacity: u64,
}

impl ProfileSubmission {
    pub fn new(
        personal_identifier: PersonalIdentifier,
        base_region: RegionName,
        expertise_areas: ExpertiseAreas,
        weekly_capacity: u64,
    ) -> Self {
        Self {
            personal_identifier,
            base_region,
            expertise_areas,
            weekly_capacity,
        }
    }

    /// Build a submission from plain values, enforcing the field-type bounds.
    pub fn from_parts<I, S>(
        identifier: &str,
        region: &str,
        expertise: I,
        weekly_capacity: u64,
    ) -> Result<Self, TypeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            personal_identifier: PersonalIdentifier::new(identifier)?,
            base_region: RegionName::new(region)?,
            expertise_areas: ExpertiseAreas::from_strs(expertise)?,
            weekly_capacity,
        })
    }

    /// All completeness rules hold, evaluated as one combined condition.
    pub fn is_complete(&self) -> bool {
        !self.personal_identifier.is_empty()
            && !self.base_region.is_empty()
            && !self.expertise_areas.is_empty()
            && self.weekly_capacity >= 1
    }
}

/// A stored talent profile.
///
/// Fields are private: the only ways to obtain a `Record` are
/// [`Record::from_submission`] and deserialization, and both enforce
/// [`ProfileSubmission::is_complete`]. A `Record` is therefore always a
/// complete profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProfileSubmission", into = "ProfileSubmission")]
pub struct Record {
    personal_identifier: PersonalIdentifier,
    base_region: RegionName,
    expertise_areas: ExpertiseAreas,
    weekly_capacity: u64,
}

impl Record {
    pub fn from_submission(submission: ProfileSubmission) -> Result<Self, TypeError> {
        if !submission.is_complete() {
            return Err(TypeError::IncompleteProfile);
        }
        let ProfileSubmission {
            personal_identifier,
            base_region,
            expertise_areas,
            weekly_capacity,
        } = submission;
        Ok(Self {
            personal_identifier,
            base_region,
            expertise_areas,
            weekly_capacity,
        })
    }

    pub fn personal_identifier(&self) -> &PersonalIdentifier {
        &self.personal_identifier
    }

    pub fn base_region(&self) -> &RegionName {
        &self.base_region
    }

    pub fn expertise_areas(&self) -> &ExpertiseAreas {
        &self.expertise_areas
    }

    pub fn weekly_capacity(&self) -> u64 {
        self.weekly_capacity
    }
}

impl TryFrom<ProfileSubmission> for Record {
    type Error = TypeError;

    fn try_from(value: ProfileSubmission) -> Result<Self, Self::Error> {
        Self::from_submission(value)
    }
}

impl From<Record> for ProfileSubmission {
    fn from(record: Record) -> Self {
        Self {
            personal_identifier: record.personal_identifier,
            base_region: record.base_region,
            expertise_areas: record.expertise_areas,
            weekly_capacity: record.weekly_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: &str, region: &str, areas: &[&str], cap: u64) -> ProfileSubmission {
        ProfileSubmission::from_parts(id, region, areas.iter().copied(), cap).unwrap()
    }

    #[test]
    fn complete_submission_becomes_record() {
        let record = Record::from_submission(submission("Ada", "London", &["math"], 12)).unwrap();
        assert_eq!(record.personal_identifier(), "Ada");
        assert_eq!(record.base_region(), "London");
        assert_eq!(record.expertise_areas().labels(), vec!["math"]);
        assert_eq!(record.weekly_capacity(), 12);
    }

    #[test]
    fn each_completeness_rule_is_enforced() {
        for bad in [
            submission("", "R", &["x"], 5),
            submission("N", "", &["x"], 5),
            submission("N", "R", &[], 5),
            submission("N", "R", &["x"], 0),
        ] {
            assert!(!bad.is_complete());
            assert_eq!(
                Record::from_submission(bad),
                Err(TypeError::IncompleteProfile)
            );
        }
    }

    #[test]
    fn record_json_shape_matches_submission() {
        let record = Record::from_submission(submission("Ada", "London", &["math", "logic"], 3))
            .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "personal_identifier": "Ada",
                "base_region": "London",
                "expertise_areas": ["math", "logic"],
                "weekly_capacity": 3,
            })
        );
    }

    #[test]
    fn deserializing_an_incomplete_record_fails() {
        let json = r#"{
            "personal_identifier": "Ada",
            "base_region": "London",
            "expertise_areas": [],
            "weekly_capacity": 3
        }"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
        // The same payload is a well-formed (if incomplete) submission.
        assert!(serde_json::from_str::<ProfileSubmission>(json).is_ok());
    }
}
