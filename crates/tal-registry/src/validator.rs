use tal_types::{ProfileSubmission, Record};
use tracing::debug;

use crate::error::RegistryError;

/// Check a submission and turn it into a storable [`Record`].
///
/// The identifier and region must be non-empty, at least one expertise area
/// must be given, and the weekly capacity must be at least one. The rules are
/// evaluated as a single condition and any failure is reported as
/// [`RegistryError::CapacityInvalid`], without saying which rule failed.
/// Upper length bounds are carried by the field types themselves.
pub fn validate(submission: ProfileSubmission) -> Result<Record, RegistryError> {
    Record::from_submission(submission).map_err(|e| {
        debug!(error = %e, "profile submission rejected");
        RegistryError::CapacityInvalid
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn submission(id: &str, region: &str, areas: &[&str], cap: u64) -> ProfileSubmission {
        ProfileSubmission::from_parts(id, region, areas.iter().copied(), cap).unwrap()
    }

    #[test]
    fn accepts_complete_submission() {
        let record = validate(submission("Name", "Region", &["x"], 5)).unwrap();
        assert_eq!(record.weekly_capacity(), 5);
    }

    #[test]
    fn empty_identifier_is_capacity_invalid() {
        let err = validate(submission("", "Region", &["x"], 5)).unwrap_err();
        assert!(matches!(err, RegistryError::CapacityInvalid));
    }

    #[test]
    fn empty_region_is_capacity_invalid() {
        let err = validate(submission("Name", "", &["x"], 5)).unwrap_err();
        assert!(matches!(err, RegistryError::CapacityInvalid));
    }

    // Expertise failures share the capacity code; ExpertiseInvalid (403) is
    // never produced. If this test starts failing, the codes were split.
    #[test]
    fn empty_expertise_reports_capacity_code_not_expertise_code() {
        let err = validate(submission("Name", "Region", &[], 5)).unwrap_err();
        assert!(matches!(err, RegistryError::CapacityInvalid));
        assert_eq!(err.code(), 400);
        assert_ne!(err.code(), RegistryError::EXPERTISE_INVALID);
    }

    #[test]
    fn zero_capacity_is_capacity_invalid() {
        let err = validate(submission("Name", "Region", &["x"], 0)).unwrap_err();
        assert!(matches!(err, RegistryError::CapacityInvalid));
    }

    proptest! {
        #[test]
        fn accepts_exactly_the_complete_submissions(
            id in "[a-z]{0,3}",
            region in "[a-z]{0,3}",
            areas in proptest::collection::vec("[a-z]{1,5}", 0..=10),
            cap in 0u64..4,
        ) {
            let complete = !id.is_empty() && !region.is_empty() && !areas.is_empty() && cap >= 1;
            let sub = ProfileSubmission::from_parts(&id, &region, areas.clone(), cap).unwrap();
            match validate(sub) {
                Ok(record) => {
                    prop_assert!(complete);
                    prop_assert_eq!(record.personal_identifier().as_str(), id.as_str());
                    prop_assert_eq!(record.expertise_areas().labels(), areas.iter().map(String::as_str).collect::<Vec<_>>());
                }
                Err(err) => {
                    prop_assert!(!complete);
                    prop_assert_eq!(err.code(), 400);
                }
            }
        }
    }
}
