use thiserror::Error;

use tal_store::StoreError;

/// Errors returned by registry operations.
///
/// Every variant carries a stable numeric code (see [`RegistryError::code`]).
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The identity has no stored profile.
    #[error("record missing")]
    RecordMissing,

    /// The identity already has a stored profile.
    #[error("duplicate entry")]
    DuplicateEntry,

    /// Reserved for expertise-specific validation failures. No operation
    /// currently returns it; every validation failure is `CapacityInvalid`.
    #[error("expertise invalid")]
    ExpertiseInvalid,

    /// The submitted profile failed validation.
    #[error("capacity invalid")]
    CapacityInvalid,

    /// The backing store failed; no write was applied.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    pub const RECORD_MISSING: u32 = 404;
    pub const DUPLICATE_ENTRY: u32 = 409;
    pub const EXPERTISE_INVALID: u32 = 403;
    pub const CAPACITY_INVALID: u32 = 400;
    pub const STORE_FAILURE: u32 = 500;

    /// Numeric code of this error.
    pub fn code(&self) -> u32 {
        match self {
            Self::RecordMissing => Self::RECORD_MISSING,
            Self::DuplicateEntry => Self::DUPLICATE_ENTRY,
            Self::ExpertiseInvalid => Self::EXPERTISE_INVALID,
            Self::CapacityInvalid => Self::CAPACITY_INVALID,
            Self::Store(_) => Self::STORE_FAILURE,
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(RegistryError::RecordMissing.code(), 404);
        assert_eq!(RegistryError::DuplicateEntry.code(), 409);
        assert_eq!(RegistryError::ExpertiseInvalid.code(), 403);
        assert_eq!(RegistryError::CapacityInvalid.code(), 400);
        assert_eq!(
            RegistryError::Store(StoreError::LockPoisoned("x".into())).code(),
            500
        );
    }
}
