//! Foundation types for the Talent Ledger.
//!
//! Every other Talent Ledger crate depends on `tal-types`. It defines the
//! identity a profile is keyed by and the value types a profile is made of.
//!
//! # Key Types
//!
//! - [`CallerId`] — Persistent identity of a caller, derived from identity material
//! - [`BoundedText`] — Text field with a compile-time character limit
//! - [`ExpertiseAreas`] — Ordered list of at most ten expertise labels
//! - [`ProfileSubmission`] — Unvalidated write input
//! - [`Record`] — A stored, always-complete talent profile
//! - [`ProfileSummary`], [`RegionExpertise`], [`FullProfile`] — Read views

pub mod error;
pub mod identity;
pub mod record;
pub mod text;
pub mod views;

pub use error::TypeError;
pub use identity::{CallerId, IdentityMaterial};
pub use record::{ProfileSubmission, Record};
pub use text::{
    BoundedText, ExpertiseArea, ExpertiseAreas, PersonalIdentifier, RegionName,
    MAX_EXPERTISE_AREAS, MAX_EXPERTISE_CHARS, MAX_IDENTIFIER_CHARS, MAX_REGION_CHARS,
};
pub use views::{FullProfile, ProfileSummary, RegionExpertise, RegistrationStatus};
